/// Modal alert overlay
use iced::widget::{button, center, column, container, mouse_area, opaque, stack, text};
use iced::{Color, Element, Length};

use crate::state::screen::{Alert, AlertKind};
use crate::state::Message;

/// Lay `alert` over `base`, blocking input to everything underneath
pub fn overlay<'a>(base: Element<'a, Message>, alert: &'a Alert) -> Element<'a, Message> {
    let title = text(&alert.title).size(20);
    let title = match alert.kind {
        AlertKind::Info => title,
        AlertKind::Success => title.style(text::success),
        AlertKind::Error => title.style(text::danger),
    };

    let dialog = container(
        column![
            title,
            text(&alert.message).size(14),
            button("OK").on_press(Message::DismissAlert).padding([6, 20]),
        ]
        .spacing(12),
    )
    .padding(20)
    .max_width(420.0)
    .style(container::rounded_box);

    // Dimmed backdrop swallows clicks; the dialog itself only closes via OK
    let backdrop = opaque(mouse_area(
        center(opaque(dialog))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(
                    Color {
                        a: 0.7,
                        ..Color::BLACK
                    }
                    .into(),
                ),
                ..container::Style::default()
            }),
    ));

    stack![base, backdrop].into()
}
