/// Record cards
/// Pure projection of a record (and its decoded photo) into widgets
use chrono::{DateTime, Local, TimeZone, Utc};
use iced::widget::{column, container, text, Column};
use iced::{Element, Length};
use std::fmt::Display;

use crate::state::photo::Photo;
use crate::state::screen::Entry;
use crate::state::Message;

/// Height of the photo inside a card
const PHOTO_HEIGHT: f32 = 180.0;

/// `lat, lon` with five decimals
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("{:.5}, {:.5}", latitude, longitude)
}

/// Timestamp in the given zone, minutes precision
pub fn format_timestamp<Tz>(at: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(zone).format("%Y-%m-%d %H:%M").to_string()
}

/// `0 items`, `1 item`, `2 items`, ...
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{} items", count)
    }
}

/// Render a photo: the image itself, or its URI when it can't be shown
pub fn photo_view(photo: &Photo, height: f32) -> Element<'_, Message> {
    match photo {
        Photo::Image(handle) => iced::widget::image(handle.clone())
            .height(Length::Fixed(height))
            .into(),
        Photo::Link(uri) => text(format!("Photo: {}", uri)).size(12).into(),
    }
}

/// One card in the list
pub fn view(entry: &Entry) -> Element<'_, Message> {
    let record = &entry.record;

    let mut card: Column<Message> = column![text(&record.title).size(20)].spacing(6);

    if let Some(created_at) = &record.created_at {
        card = card.push(text(format_timestamp(created_at, &Local)).size(12));
    }

    card = card
        .push(text(&record.description).size(14))
        .push(text(format_coordinates(record.latitude, record.longitude)).size(12));

    if let Some(photo) = &entry.photo {
        card = card.push(photo_view(photo, PHOTO_HEIGHT));
    }

    container(card)
        .padding(12)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_coordinates() {
        assert_eq!(format_coordinates(40.712, -74.006), "40.71200, -74.00600");
        assert_eq!(format_coordinates(0.123456789, 1.0), "0.12346, 1.00000");
    }

    #[test]
    fn test_format_timestamp_in_zone() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&at, &Utc), "2024-01-01 00:00");

        let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_timestamp(&at, &new_york), "2023-12-31 19:00");
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0), "0 items");
        assert_eq!(count_label(1), "1 item");
        assert_eq!(count_label(12), "12 items");
    }
}
