/// The form-and-list screen
///
/// `Screen` owns the draft, the record list and the status flags. All of
/// its transitions are synchronous: anything that needs a collaborator
/// (records API, location, camera) is returned from `update` as an
/// `Effect`, and the outcome comes back later as another `Message`.

use super::data::{Coordinates, Draft, NewRecord, Record};
use super::photo::{jpeg_data_uri, Photo};
use crate::services::{Capture, CaptureOptions};

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    TitleChanged(String),
    DescriptionChanged(String),
    /// User asked to reload the list
    Refresh,
    /// The list fetch finished
    RecordsLoaded(Result<Vec<Record>, Failure>),
    AcquireLocation,
    LocationResolved(LocationOutcome),
    CapturePhoto,
    PhotoCaptured(CaptureOutcome),
    RemovePhoto,
    Submit,
    /// The POST finished
    Submitted(Result<Record, Failure>),
    DismissAlert,
}

/// Collaborator calls requested by the screen
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchRecords,
    AcquireLocation,
    CapturePhoto(CaptureOptions),
    Submit(NewRecord),
}

/// Result of asking the location provider for a fix
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    Denied,
    Fixed(Coordinates),
    Failed(String),
}

/// Result of asking the camera for a still image
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Denied,
    Captured(Capture),
    Failed(String),
}

/// How a collaborator call failed, as far as the user is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server answered, but not with success
    Rejected,
    /// The request never got an answer
    Connection,
}

/// A failed API call, cloneable so it can travel inside a `Message`
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Success,
    Error,
}

/// A blocking message shown over the screen until dismissed
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(kind: AlertKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// One row of the list: the record plus its decoded photo
#[derive(Debug, Clone)]
pub struct Entry {
    pub record: Record,
    pub photo: Option<Photo>,
}

impl Entry {
    fn new(record: Record) -> Self {
        let photo = record.photo.as_deref().map(Photo::from_uri);
        Self { record, photo }
    }
}

/// Main screen state
#[derive(Debug)]
pub struct Screen {
    draft: Draft,
    /// Preview of `draft.photo`, decoded once when it changes
    draft_photo: Option<Photo>,
    /// Newest first
    entries: Vec<Entry>,
    /// Initial (or refresh) fetch in flight
    loading: bool,
    /// Submit in flight
    busy: bool,
    /// Location request in flight (status only, never blocks the button)
    locating: bool,
    alert: Option<Alert>,
    capture_options: CaptureOptions,
}

impl Screen {
    pub fn new(capture_options: CaptureOptions) -> Self {
        Self {
            draft: Draft::default(),
            draft_photo: None,
            entries: Vec::new(),
            loading: false,
            busy: false,
            locating: false,
            alert: None,
            capture_options,
        }
    }

    /// First render: load the list
    pub fn initialize(&mut self) -> Option<Effect> {
        self.loading = true;
        Some(Effect::FetchRecords)
    }

    /// Handle a message and say which collaborator call, if any, to make next
    pub fn update(&mut self, message: Message) -> Option<Effect> {
        match message {
            Message::TitleChanged(title) => {
                self.draft.title = title;
                None
            }
            Message::DescriptionChanged(description) => {
                self.draft.description = description;
                None
            }
            Message::Refresh => {
                // A list fetched mid-submit could drop the record being created
                if !self.can_refresh() {
                    return None;
                }
                self.initialize()
            }
            Message::RecordsLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(records) => {
                        tracing::info!(count = records.len(), "records loaded");
                        self.entries = records.into_iter().map(Entry::new).collect();
                    }
                    Err(failure) => {
                        self.alert = Some(Alert::new(
                            AlertKind::Error,
                            "Error",
                            format!("Could not load places: {}", failure.detail),
                        ));
                    }
                }
                None
            }
            Message::AcquireLocation => {
                self.locating = true;
                Some(Effect::AcquireLocation)
            }
            Message::LocationResolved(outcome) => {
                self.locating = false;
                match outcome {
                    LocationOutcome::Fixed(coordinates) => self.draft.set_location(coordinates),
                    LocationOutcome::Denied => {
                        self.alert = Some(Alert::new(
                            AlertKind::Info,
                            "Permission denied",
                            "Location access is needed to tag the place.",
                        ));
                    }
                    LocationOutcome::Failed(detail) => {
                        self.alert = Some(Alert::new(
                            AlertKind::Error,
                            "Location unavailable",
                            format!("Could not get the current position: {}", detail),
                        ));
                    }
                }
                None
            }
            Message::CapturePhoto => Some(Effect::CapturePhoto(self.capture_options)),
            Message::PhotoCaptured(outcome) => {
                match outcome {
                    CaptureOutcome::Captured(Capture::Cancelled) => {}
                    CaptureOutcome::Captured(Capture::Uri(uri)) => self.set_photo(uri),
                    CaptureOutcome::Captured(Capture::Base64(payload)) => {
                        self.set_photo(jpeg_data_uri(&payload))
                    }
                    CaptureOutcome::Denied => {
                        self.alert = Some(Alert::new(
                            AlertKind::Info,
                            "Permission denied",
                            "Camera access is needed to attach a photo.",
                        ));
                    }
                    CaptureOutcome::Failed(detail) => {
                        self.alert = Some(Alert::new(
                            AlertKind::Error,
                            "Photo failed",
                            format!("Could not use that photo: {}", detail),
                        ));
                    }
                }
                None
            }
            Message::RemovePhoto => {
                self.draft.photo = None;
                self.draft_photo = None;
                None
            }
            Message::Submit => {
                // Single busy flag guards re-entry
                if self.busy {
                    return None;
                }
                match self.draft.validate() {
                    Ok(new) => {
                        self.busy = true;
                        Some(Effect::Submit(new))
                    }
                    Err(err) => {
                        self.alert = Some(Alert::new(AlertKind::Info, "Missing fields", err.to_string()));
                        None
                    }
                }
            }
            Message::Submitted(result) => {
                self.busy = false;
                match result {
                    Ok(record) => {
                        tracing::info!(id = %record.id, "record created");
                        self.entries.insert(0, Entry::new(record));
                        self.draft.clear();
                        self.draft_photo = None;
                        self.alert = Some(Alert::new(AlertKind::Success, "Saved", "The place was submitted."));
                    }
                    Err(Failure { kind: FailureKind::Rejected, .. }) => {
                        self.alert = Some(Alert::new(
                            AlertKind::Error,
                            "Error",
                            "The server could not save the place. Please try again.",
                        ));
                    }
                    Err(Failure { kind: FailureKind::Connection, .. }) => {
                        self.alert = Some(Alert::new(
                            AlertKind::Error,
                            "Connection failed",
                            "Could not reach the server. Check your connection and try again.",
                        ));
                    }
                }
                None
            }
            Message::DismissAlert => {
                self.alert = None;
                None
            }
        }
    }

    fn set_photo(&mut self, uri: String) {
        self.draft_photo = Some(Photo::from_uri(&uri));
        self.draft.photo = Some(uri);
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_photo(&self) -> Option<&Photo> {
        self.draft_photo.as_ref()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Records in list order (newest first)
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|entry| &entry.record)
    }

    /// Refresh waits for any fetch or submit in flight
    pub fn can_refresh(&self) -> bool {
        !self.loading && !self.busy
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_locating(&self) -> bool {
        self.locating
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }
}
