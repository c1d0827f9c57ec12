/// Input form: title, description, location and photo controls, submit
use iced::widget::{button, column, row, text, text_input, Column};
use iced::{Alignment, Element};

use super::card::{format_coordinates, photo_view};
use crate::state::{Message, Screen};

/// Height of the draft photo preview
const PREVIEW_HEIGHT: f32 = 120.0;

pub fn view(screen: &Screen) -> Element<'_, Message> {
    let draft = screen.draft();

    let location_status = if screen.is_locating() {
        "Locating...".to_string()
    } else {
        match draft.coordinates() {
            Some(fix) => format_coordinates(fix.latitude, fix.longitude),
            None => "No location yet".to_string(),
        }
    };

    let location = row![
        button("Get location")
            .on_press(Message::AcquireLocation)
            .style(button::secondary),
        text(location_status).size(14),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut photo = row![button("Take photo")
        .on_press(Message::CapturePhoto)
        .style(button::secondary)]
    .spacing(12)
    .align_y(Alignment::Center);
    if draft.photo.is_some() {
        photo = photo.push(
            button("Remove photo")
                .on_press(Message::RemovePhoto)
                .style(button::danger),
        );
    }

    // Busy swaps the label and drops the press handler
    let submit_label = if screen.is_busy() { "Submitting..." } else { "Submit" };
    let submit = button(text(submit_label))
        .on_press_maybe((!screen.is_busy()).then_some(Message::Submit))
        .padding(10);

    let mut form: Column<Message> = column![
        text_input("Title", &draft.title)
            .on_input(Message::TitleChanged)
            .padding(10),
        text_input("Description", &draft.description)
            .on_input(Message::DescriptionChanged)
            .on_submit(Message::Submit)
            .padding(10),
        location,
        photo,
    ]
    .spacing(12);

    if let Some(preview) = screen.draft_photo() {
        form = form.push(photo_view(preview, PREVIEW_HEIGHT));
    }

    form.push(submit).into()
}
