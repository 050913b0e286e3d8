//! Multi-line record reassembly for PDF-extracted report text.
//!
//! PDF text extraction flattens table rows into a stream of lines in which
//! one business may span several lines: the GSTIN and part of the trade
//! name on one line, the rest of the name on the next, the officer on a
//! third, and the mobile number wherever column wrapping pushed it.
//!
//! The [`Reassembler`] folds the classified lines through a
//! [`ReassemblerState`] value. Registration-id lines are treated as the
//! record boundary. A record opened without a phone number must find one
//! within the next few lines (see
//! [`ExtractionConfig::lookahead`](crate::ExtractionConfig)). On a hit the
//! lines up to the phone are applied to the record, the record is flushed
//! at once, and the main cursor passes over those lines. On a miss the
//! record is discarded and the following lines are classified as usual.

use gst_contacts_contact_models::{CandidateContact, UNKNOWN_NAME};

use crate::classify::{LineClass, LineClassifier, OfficerPredicate, find_phone};
use crate::normalize::normalize_name;

/// A record being accumulated from consecutive lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InFlightRecord {
    /// Normalized name text; `None` while the name is still the default.
    pub name: Option<String>,
    /// Phone number committed on this line or associated by lookahead.
    pub phone_number: Option<String>,
    /// GSTIN that opened the record, if any.
    pub registration_id: Option<String>,
    /// Whether following name fragments still extend the name.
    pub accumulating_name: bool,
}

impl InFlightRecord {
    /// Converts the record into an output candidate, if it has a phone.
    #[must_use]
    pub fn into_candidate(self) -> Option<CandidateContact> {
        let phone_number = self.phone_number?;
        Some(CandidateContact::new(
            self.name.as_deref().unwrap_or(UNKNOWN_NAME),
            &phone_number,
            self.registration_id.as_deref().unwrap_or_default(),
        ))
    }

    fn append_name(&mut self, fragment: String) {
        match &mut self.name {
            Some(name) => {
                name.push(' ');
                name.push_str(&fragment);
            }
            None => self.name = Some(fragment),
        }
    }
}

/// Where the reassembler is between two lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReassemblerState {
    /// No record is open.
    #[default]
    Idle,
    /// A record is open and still waiting for its phone.
    Collecting(InFlightRecord),
    /// A record was completed by lookahead; lines up to and including
    /// `through` were already applied to it.
    Resolved {
        /// Index of the phone line that completed the record.
        through: usize,
    },
}

impl ReassemblerState {
    /// Flushes whatever is in flight at end of input.
    ///
    /// A record holding a phone becomes a candidate; a record that never
    /// found a phone is discarded.
    pub fn finish(self, out: &mut Vec<CandidateContact>) {
        if let Self::Collecting(record) = self {
            flush(record, out);
        }
    }
}

/// Turns classified lines into candidate contacts.
#[derive(Debug)]
pub struct Reassembler<'c, P> {
    classifier: &'c LineClassifier<P>,
    lookahead: usize,
}

impl<'c, P: OfficerPredicate> Reassembler<'c, P> {
    /// Creates a reassembler that scans at most `lookahead` lines ahead.
    #[must_use]
    pub const fn new(classifier: &'c LineClassifier<P>, lookahead: usize) -> Self {
        Self {
            classifier,
            lookahead,
        }
    }

    /// Runs the whole line sequence and returns the raw (not yet
    /// deduplicated) candidates in emission order.
    #[must_use]
    pub fn reassemble(&self, lines: &[&str]) -> Vec<CandidateContact> {
        let (state, mut out) = lines.iter().enumerate().fold(
            (ReassemblerState::Idle, Vec::new()),
            |(state, mut out), (index, line)| {
                let class = self.classifier.classify(line);
                let state = self.step(state, index, class, &mut out);
                let state = self.look_ahead(state, lines, index, &mut out);
                (state, out)
            },
        );

        state.finish(&mut out);
        out
    }

    /// Applies one classified line to `state`, pushing any completed
    /// candidates onto `out`.
    pub fn step(
        &self,
        state: ReassemblerState,
        index: usize,
        class: LineClass<'_>,
        out: &mut Vec<CandidateContact>,
    ) -> ReassemblerState {
        let open = match state {
            ReassemblerState::Resolved { through } if index < through => {
                return ReassemblerState::Resolved { through };
            }
            ReassemblerState::Resolved { through } if index == through => {
                return ReassemblerState::Idle;
            }
            ReassemblerState::Idle | ReassemblerState::Resolved { .. } => None,
            ReassemblerState::Collecting(record) => Some(record),
        };

        match (open, class) {
            (open, LineClass::RegistrationId { id, remainder }) => {
                if let Some(previous) = open {
                    flush(previous, out);
                }
                self.open_registration(id, remainder, out)
            }
            (None, LineClass::Phone(number)) => {
                log::debug!("Line {index}: dropping orphaned phone {number}");
                ReassemblerState::Idle
            }
            (Some(mut record), LineClass::Phone(number)) => {
                record.phone_number = Some(number.to_owned());
                flush(record, out);
                ReassemblerState::Idle
            }
            (None, LineClass::PureSerial | LineClass::Noise) => ReassemblerState::Idle,
            (Some(record), LineClass::PureSerial) => ReassemblerState::Collecting(record),
            (Some(mut record), LineClass::Noise) => {
                record.accumulating_name = false;
                ReassemblerState::Collecting(record)
            }
            (open, LineClass::NameFragment(text)) => {
                let fragment = normalize_name(text);
                if fragment.is_empty() {
                    return open.map_or(ReassemblerState::Idle, ReassemblerState::Collecting);
                }
                match open {
                    Some(mut record) => {
                        if record.accumulating_name {
                            record.append_name(fragment);
                        } else {
                            log::trace!("Line {index}: ignoring {fragment:?} after officer line");
                        }
                        ReassemblerState::Collecting(record)
                    }
                    None => ReassemblerState::Collecting(InFlightRecord {
                        name: Some(fragment),
                        accumulating_name: true,
                        ..InFlightRecord::default()
                    }),
                }
            }
        }
    }

    /// Opens a record for a GSTIN line, resolving it at once if the same
    /// line also carries the phone number.
    fn open_registration(
        &self,
        id: &str,
        remainder: &str,
        out: &mut Vec<CandidateContact>,
    ) -> ReassemblerState {
        let phone = find_phone(remainder);
        let name_region = phone.map_or(remainder, |m| &remainder[..m.start()]);

        // Single-line rows read `GSTIN NAME OFFICER-JI PHONE`; the name stops
        // at the first officer token.
        let tokens: Vec<&str> = name_region.split_whitespace().collect();
        let officer_at = tokens
            .iter()
            .position(|token| self.classifier.is_officer_line(token));
        let name_tokens = officer_at.map_or(&tokens[..], |at| &tokens[..at]);
        let name = normalize_name(&name_tokens.join(" "));

        let mut record = InFlightRecord {
            name: (!name.is_empty() && !self.classifier.is_officer_line(&name)).then_some(name),
            phone_number: None,
            registration_id: Some(id.to_owned()),
            accumulating_name: officer_at.is_none(),
        };

        if let Some(phone) = phone {
            record.phone_number = Some(phone.as_str().to_owned());
            flush(record, out);
            return ReassemblerState::Idle;
        }

        ReassemblerState::Collecting(record)
    }

    /// Scans forward from `index` for the phone of the open record.
    ///
    /// Looks at most `lookahead` lines ahead and stops early at the next
    /// GSTIN line. On a hit, the lines up to and including the phone line
    /// are stepped into the record, which flushes it, and the state becomes
    /// [`ReassemblerState::Resolved`] so the main cursor skips them. On a
    /// miss the record is discarded.
    fn look_ahead(
        &self,
        state: ReassemblerState,
        lines: &[&str],
        index: usize,
        out: &mut Vec<CandidateContact>,
    ) -> ReassemblerState {
        let ReassemblerState::Collecting(record) = state else {
            return state;
        };
        if record.phone_number.is_some() {
            return ReassemblerState::Collecting(record);
        }

        let window = lines
            .iter()
            .enumerate()
            .skip(index + 1)
            .take(self.lookahead);
        let mut between = Vec::new();

        for (ahead, line) in window {
            match self.classifier.classify(line) {
                LineClass::Phone(number) => {
                    log::trace!("Line {index}: found phone {number} on line {ahead}");
                    let state = between
                        .into_iter()
                        .fold(ReassemblerState::Collecting(record), |state, (at, class)| {
                            self.step(state, at, class, out)
                        });
                    self.step(state, ahead, LineClass::Phone(number), out);
                    return ReassemblerState::Resolved { through: ahead };
                }
                LineClass::RegistrationId { .. } => break,
                class @ (LineClass::PureSerial | LineClass::Noise | LineClass::NameFragment(_)) => {
                    between.push((ahead, class));
                }
            }
        }

        log::debug!(
            "Line {index}: no phone within {} line(s) of the record",
            self.lookahead
        );
        flush(record, out);
        ReassemblerState::Idle
    }
}

fn flush(record: InFlightRecord, out: &mut Vec<CandidateContact>) {
    if record.phone_number.is_none() {
        log::debug!(
            "Discarding record without phone (name: {:?}, GSTIN: {:?})",
            record.name,
            record.registration_id
        );
        return;
    }
    out.extend(record.into_candidate());
}
