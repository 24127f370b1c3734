// SPDX-License-Identifier: MPL-2.0
//! Form for creating a pin at a picked map location.
//!
//! Validation happens here, before the gateway is involved: a blank title
//! or a malformed visit date blocks submission with a message.

use crate::domain::pin::{is_accepted_photo, normalize_description};
use crate::domain::{Coordinate, NewPin, PhotoFile, Title, ValidationError};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::{styles, theme};
use chrono::NaiveDate;
use iced::widget::image::Handle;
use iced::widget::{button, image, scrollable, text_input, Column, Container, Row, Text};
use iced::{alignment, ContentFit, Element, Length};
use std::path::PathBuf;

/// Format accepted for the visit date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const UNREADABLE_PHOTO: &str = "add-pin-error-unreadable-photo";

pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub state: &'a State,
}

#[derive(Debug, Clone)]
pub enum Message {
    TitleChanged(String),
    VisitDateChanged(String),
    NotesChanged(String),
    BrowsePhotos,
    RemovePhoto(usize),
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    None,
    /// Open the native file dialog.
    BrowsePhotos,
    /// Validated draft ready for the gateway.
    Submit(NewPin),
    Cancel,
}

/// A picked or dropped file, with its size read off the update loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub path: PathBuf,
    /// `None` when the file could not be read.
    pub size: Option<u64>,
}

/// Reads the size of every accepted file. Other files pass through unread
/// so the form can report them.
pub async fn inspect(paths: Vec<PathBuf>) -> Vec<PickedFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let size = if is_accepted_photo(&path) {
            match tokio::fs::metadata(&path).await {
                Ok(metadata) => Some(metadata.len()),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "cannot read photo");
                    None
                }
            }
        } else {
            None
        };
        files.push(PickedFile { path, size });
    }
    files
}

#[derive(Debug, Clone)]
pub struct State {
    coordinate: Coordinate,
    title: String,
    visit_date: String,
    notes: String,
    photos: Vec<PhotoFile>,
    error: Option<&'static str>,
    saving: bool,
}

impl State {
    /// Empty form for `coordinate`, with the visit date set to `today`.
    #[must_use]
    pub fn new(coordinate: Coordinate, today: NaiveDate) -> Self {
        Self {
            coordinate,
            title: String::new(),
            visit_date: today.format(DATE_FORMAT).to_string(),
            notes: String::new(),
            photos: Vec::new(),
            error: None,
            saving: false,
        }
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[must_use]
    pub fn photos(&self) -> &[PhotoFile] {
        &self.photos
    }

    /// i18n key of the current validation message.
    #[must_use]
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Re-enables the form after a failed save, keeping every field.
    pub fn finish_saving(&mut self) {
        self.saving = false;
    }

    /// Adds dropped or picked files. Files with other extensions or that
    /// could not be read are skipped and reported; files already attached
    /// are ignored. A batch that attaches files without any rejection
    /// clears the previous message.
    pub fn add_photos(&mut self, files: impl IntoIterator<Item = PickedFile>) {
        let mut accepted = false;
        let mut rejection = None;

        for PickedFile { path, size } in files {
            if self.photos.iter().any(|photo| photo.path == path) {
                continue;
            }
            if !is_accepted_photo(&path) {
                tracing::debug!(path = %path.display(), "ignoring non-image file");
                rejection = Some(ValidationError::UnsupportedPhoto(path).i18n_key());
                continue;
            }
            let Some(size) = size else {
                rejection = Some(UNREADABLE_PHOTO);
                continue;
            };
            match PhotoFile::describe(&path, size) {
                Ok(photo) => {
                    self.photos.push(photo);
                    accepted = true;
                }
                Err(err) => rejection = Some(err.i18n_key()),
            }
        }

        if rejection.is_some() {
            self.error = rejection;
        } else if accepted {
            self.error = None;
        }
    }

    fn validate(&self) -> Result<NewPin, ValidationError> {
        let title = Title::parse(&self.title)?;
        let visit_date = NaiveDate::parse_from_str(self.visit_date.trim(), DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidVisitDate(self.visit_date.clone()))?;

        Ok(NewPin {
            coordinate: self.coordinate,
            title,
            description: normalize_description(&self.notes),
            visit_date,
            photos: self.photos.clone(),
        })
    }

    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::TitleChanged(title) => {
                self.title = title;
                Event::None
            }
            Message::VisitDateChanged(date) => {
                self.visit_date = date;
                Event::None
            }
            Message::NotesChanged(notes) => {
                self.notes = notes;
                Event::None
            }
            Message::BrowsePhotos => Event::BrowsePhotos,
            Message::RemovePhoto(index) => {
                if index < self.photos.len() {
                    self.photos.remove(index);
                }
                Event::None
            }
            Message::Submit => {
                if self.saving {
                    return Event::None;
                }
                match self.validate() {
                    Ok(draft) => {
                        self.error = None;
                        self.saving = true;
                        Event::Submit(draft)
                    }
                    Err(err) => {
                        self.error = Some(err.i18n_key());
                        Event::None
                    }
                }
            }
            Message::Cancel => Event::Cancel,
        }
    }
}

pub fn view<'a>(ctx: ViewContext<'a>) -> Element<'a, Message> {
    let i18n = ctx.i18n;
    let state = ctx.state;

    let heading = Text::new(i18n.tr("add-pin-title")).size(typography::TITLE_MD);
    let location = Text::new(format!("{:.6}", state.coordinate))
        .size(typography::CAPTION)
        .color(theme::muted_text_color());

    let field = |label: String, input: Element<'a, Message>| -> Element<'a, Message> {
        Column::new()
            .spacing(spacing::XXS)
            .push(Text::new(label).size(typography::BODY_SM))
            .push(input)
            .into()
    };

    let mut title_input = text_input(&i18n.tr("add-pin-title-placeholder"), &state.title)
        .padding(spacing::XS);
    let mut date_input = text_input("YYYY-MM-DD", &state.visit_date).padding(spacing::XS);
    let mut notes_input = text_input(&i18n.tr("add-pin-notes-placeholder"), &state.notes)
        .padding(spacing::XS);
    if !state.saving {
        title_input = title_input
            .on_input(Message::TitleChanged)
            .on_submit(Message::Submit);
        date_input = date_input.on_input(Message::VisitDateChanged);
        notes_input = notes_input.on_input(Message::NotesChanged);
    }

    let mut photos = Column::new().spacing(spacing::XXS);
    for (index, photo) in state.photos.iter().enumerate() {
        let preview = image(Handle::from_path(&photo.path))
            .width(Length::Fixed(sizing::THUMBNAIL))
            .height(Length::Fixed(sizing::THUMBNAIL))
            .content_fit(ContentFit::Cover);
        let mut remove = button(Text::new("×")).style(styles::button::unselected);
        if !state.saving {
            remove = remove.on_press(Message::RemovePhoto(index));
        }
        photos = photos.push(
            Row::new()
                .spacing(spacing::XS)
                .align_y(alignment::Vertical::Center)
                .push(preview)
                .push(Text::new(photo.name.as_str()).size(typography::BODY_SM).width(Length::Fill))
                .push(remove),
        );
    }

    let mut browse = button(Text::new(i18n.tr("add-pin-add-photos"))).style(styles::button::unselected);
    if !state.saving {
        browse = browse.on_press(Message::BrowsePhotos);
    }
    let photo_section = Column::new()
        .spacing(spacing::XS)
        .push(Text::new(i18n.tr("add-pin-photos-label")).size(typography::BODY_SM))
        .push(photos)
        .push(
            Row::new()
                .spacing(spacing::SM)
                .align_y(alignment::Vertical::Center)
                .push(browse)
                .push(
                    Text::new(i18n.tr("add-pin-drop-hint"))
                        .size(typography::CAPTION)
                        .color(theme::muted_text_color()),
                ),
        );

    let save_label = if state.saving {
        i18n.tr("add-pin-saving")
    } else {
        i18n.tr("add-pin-save")
    };
    let save = if state.saving {
        button(Text::new(save_label)).style(styles::button::disabled())
    } else {
        button(Text::new(save_label))
            .on_press(Message::Submit)
            .style(styles::button::primary)
    };
    let mut cancel = button(Text::new(i18n.tr("add-pin-cancel"))).style(styles::button::unselected);
    if !state.saving {
        cancel = cancel.on_press(Message::Cancel);
    }

    let mut form = Column::new()
        .spacing(spacing::SM)
        .push(heading)
        .push(location)
        .push(field(i18n.tr("add-pin-title-label"), title_input.into()))
        .push(field(i18n.tr("add-pin-visit-date-label"), date_input.into()))
        .push(field(i18n.tr("add-pin-notes-label"), notes_input.into()))
        .push(photo_section);

    if let Some(key) = state.error {
        form = form.push(
            Text::new(i18n.tr(key))
                .size(typography::BODY_SM)
                .color(theme::error_text_color()),
        );
    }

    form = form.push(
        Row::new()
            .spacing(spacing::SM)
            .push(Container::new(cancel).width(Length::Fill))
            .push(save),
    );

    Container::new(scrollable(form.padding(spacing::MD)))
        .width(Length::Fixed(sizing::MODAL_WIDTH))
        .max_height(640.0)
        .style(styles::container::card)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn state() -> State {
        State::new(
            Coordinate::new(48.8566, 2.3522).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        )
    }

    fn picked(paths: Vec<PathBuf>) -> Vec<PickedFile> {
        paths
            .into_iter()
            .map(|path| PickedFile {
                size: std::fs::metadata(&path).ok().map(|m| m.len()),
                path,
            })
            .collect()
    }

    #[test]
    fn visit_date_defaults_to_today() {
        let state = state();
        assert_eq!(state.visit_date, "2024-05-17");
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut state = state();
        state.update(Message::TitleChanged("   ".into()));

        assert_eq!(state.update(Message::Submit), Event::None);
        assert_eq!(state.error(), Some("add-pin-error-title-required"));
        assert!(!state.is_saving());
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut state = state();
        state.update(Message::TitleChanged("Louvre".into()));
        state.update(Message::VisitDateChanged("17/05/2024".into()));

        assert_eq!(state.update(Message::Submit), Event::None);
        assert_eq!(state.error(), Some("add-pin-error-visit-date"));
    }

    #[test]
    fn valid_form_produces_trimmed_draft() {
        let mut state = state();
        state.update(Message::TitleChanged("  Louvre  ".into()));
        state.update(Message::VisitDateChanged(" 2023-06-01 ".into()));
        state.update(Message::NotesChanged("  Long queue  ".into()));

        let Event::Submit(draft) = state.update(Message::Submit) else {
            panic!("expected a draft");
        };
        assert_eq!(draft.title.as_str(), "Louvre");
        assert_eq!(draft.visit_date, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        assert_eq!(draft.description.as_deref(), Some("Long queue"));
        assert_eq!(draft.coordinate, state.coordinate());
        assert!(state.is_saving());
    }

    #[test]
    fn blank_notes_become_none() {
        let mut state = state();
        state.update(Message::TitleChanged("Louvre".into()));
        state.update(Message::NotesChanged("   ".into()));

        let Event::Submit(draft) = state.update(Message::Submit) else {
            panic!("expected a draft");
        };
        assert_eq!(draft.description, None);
    }

    #[test]
    fn submit_while_saving_is_ignored() {
        let mut state = state();
        state.update(Message::TitleChanged("Louvre".into()));
        assert!(matches!(state.update(Message::Submit), Event::Submit(_)));
        assert_eq!(state.update(Message::Submit), Event::None);

        state.finish_saving();
        assert!(matches!(state.update(Message::Submit), Event::Submit(_)));
    }

    #[test]
    fn failed_save_keeps_fields() {
        let mut state = state();
        state.update(Message::TitleChanged("Louvre".into()));
        state.update(Message::Submit);
        state.finish_saving();

        assert_eq!(state.title, "Louvre");
        assert!(!state.is_saving());
    }

    #[test]
    fn photos_are_filtered_and_deduplicated() {
        let dir = tempdir().unwrap();
        let jpg = dir.path().join("beach.jpg");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&jpg, [0xFF, 0xD8, 0xFF]).unwrap();
        std::fs::write(&txt, b"hello").unwrap();

        let mut state = state();
        state.add_photos(picked(vec![jpg.clone(), txt, jpg.clone()]));

        assert_eq!(state.photos().len(), 1);
        assert_eq!(state.photos()[0].name, "beach.jpg");
        assert_eq!(state.photos()[0].size, 3);
        assert_eq!(state.error(), Some("add-pin-error-unsupported-photo"));
    }

    #[test]
    fn photos_can_be_removed() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.webp");
        std::fs::write(&a, [0u8; 8]).unwrap();
        std::fs::write(&b, [0u8; 8]).unwrap();

        let mut state = state();
        state.add_photos(picked(vec![a, b]));
        state.update(Message::RemovePhoto(0));
        state.update(Message::RemovePhoto(9));

        assert_eq!(state.photos().len(), 1);
        assert_eq!(state.photos()[0].name, "b.webp");
    }

    #[test]
    fn draft_keeps_photo_order() {
        let dir = tempdir().unwrap();
        let paths: Vec<_> = ["1.jpg", "2.gif", "3.jpeg"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                std::fs::write(&path, [1u8]).unwrap();
                path
            })
            .collect();

        let mut state = state();
        state.add_photos(picked(paths));
        state.update(Message::TitleChanged("Trip".into()));

        let Event::Submit(draft) = state.update(Message::Submit) else {
            panic!("expected a draft");
        };
        let names: Vec<_> = draft.photos.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["1.jpg", "2.gif", "3.jpeg"]);
    }

    #[test]
    fn accepted_photo_clears_earlier_rejection() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        let png = dir.path().join("map.png");
        std::fs::write(&txt, b"hello").unwrap();
        std::fs::write(&png, [0u8; 4]).unwrap();

        let mut state = state();
        state.add_photos(picked(vec![txt]));
        assert_eq!(state.error(), Some("add-pin-error-unsupported-photo"));

        state.add_photos(picked(vec![png]));
        assert_eq!(state.error(), None);
        assert_eq!(state.photos().len(), 1);
    }

    #[test]
    fn unreadable_photo_is_reported_not_attached() {
        let mut state = state();
        state.add_photos(vec![PickedFile {
            path: PathBuf::from("/gone/away.jpg"),
            size: None,
        }]);

        assert!(state.photos().is_empty());
        assert_eq!(state.error(), Some("add-pin-error-unreadable-photo"));
    }

    #[tokio::test]
    async fn inspect_reads_sizes_of_images_only() {
        let dir = tempdir().unwrap();
        let jpg = dir.path().join("dune.jpg");
        let txt = dir.path().join("dune.txt");
        std::fs::write(&jpg, [0u8; 10]).unwrap();
        std::fs::write(&txt, [0u8; 3]).unwrap();
        let missing = dir.path().join("missing.webp");

        let files = inspect(vec![jpg.clone(), txt.clone(), missing.clone()]).await;

        assert_eq!(
            files,
            vec![
                PickedFile { path: jpg, size: Some(10) },
                PickedFile { path: txt, size: None },
                PickedFile { path: missing, size: None },
            ]
        );
    }
}
