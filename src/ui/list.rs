/// Scrollable list of submitted records, newest first
use iced::widget::{button, column, horizontal_space, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};

use super::card::{self, count_label};
use crate::state::{Message, Screen};

pub fn view(screen: &Screen) -> Element<'_, Message> {
    let header = row![
        text("Places").size(24),
        text(count_label(screen.records().count())).size(14),
        horizontal_space(),
        button("Refresh")
            .on_press_maybe(screen.can_refresh().then_some(Message::Refresh))
            .style(button::secondary),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let body: Element<Message> = if screen.is_loading() {
        text("Loading...").into()
    } else {
        let cards = Column::with_children(screen.entries().iter().map(card::view)).spacing(12);
        scrollable(cards).height(Length::Fill).into()
    };

    column![header, body].spacing(12).height(Length::Fill).into()
}
