use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};

use crate::format::{format_phone, format_postal_code, normalize_postal_code, normalize_state_code};
use crate::record::{Field, FormRecord};
use crate::storage::{clear_record, load_record, save_record, Storage};
use crate::validate::validate_record;
use crate::viacep::model::CepAddress;
use crate::viacep::{CepLookup, LookupError};

/// Quiet window after the last zip keystroke before the lookup fires.
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(450);

pub const MSG_LOOKING_UP: &str = "Looking up postal code...";
pub const MSG_FILLED: &str = "Address filled automatically.";
pub const MSG_NOT_FOUND: &str = "Postal code not found. Check it and try again.";
pub const MSG_LOOKUP_FAILED: &str =
    "Could not reach the postal code service right now. Try again.";
pub const MSG_SAVED: &str = "Form saved in local storage.";
pub const MSG_CLEARED: &str = "Saved form data removed.";

/// User-visible status banner. Exactly one variant is active at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Hidden,
    Success(String),
    Error(String),
}

/// Host-side events driving the form.
#[derive(Debug)]
pub enum FormEvent {
    Input { field: Field, value: String },
    Submit,
    Clear,
    Show,
}

/// Orchestrates the form: per-keystroke formatting and persistence, the
/// debounced postal-code lookup, submit and clear.
pub struct FormController<S, L> {
    record: FormRecord,
    store: S,
    lookup: Arc<L>,
    status: Status,
    /// Advanced on every zip keystroke; a lookup response is applied only if
    /// its generation still matches, so a slow response for an old code
    /// cannot overwrite newer input.
    generation: u64,
}

impl<S, L> FormController<S, L>
where
    S: Storage,
    L: CepLookup + 'static,
{
    pub fn new(store: S, lookup: L) -> Self {
        Self {
            record: FormRecord::default(),
            store,
            lookup: Arc::new(lookup),
            status: Status::Hidden,
            generation: 0,
        }
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Load the persisted record and reapply the display formats.
    fn restore(&mut self) {
        load_record(&mut self.store, &mut self.record);
        self.record.zip_code = format_postal_code(&self.record.zip_code);
        self.record.phone = format_phone(&self.record.phone);
        self.record.state = normalize_state_code(&self.record.state);
    }

    /// A restored form with a complete zip code but holes in the address
    /// resolves right away, skipping the debounce.
    fn startup_lookup_cep(&self) -> Option<String> {
        let digits = normalize_postal_code(&self.record.zip_code);
        let incomplete = self.record.address_line1.is_empty()
            || self.record.city.is_empty()
            || self.record.state.is_empty();
        (digits.len() == 8 && incomplete).then_some(digits)
    }

    fn persist(&mut self) {
        if let Err(e) = save_record(&mut self.store, &self.record) {
            error!("cannot persist form data: {e:?}");
        }
    }

    /// Apply one keystroke: field-specific formatting, then an immediate
    /// snapshot to the store. A zip keystroke also starts a new lookup
    /// generation, invalidating whatever is still in flight.
    fn apply_input(&mut self, field: Field, raw: &str) {
        match field {
            Field::ZipCode => {
                self.record.zip_code = format_postal_code(raw);
                self.generation += 1;
            }
            Field::Phone => self.record.phone = format_phone(raw),
            Field::State => self.record.state = normalize_state_code(raw),
            other => self.record.set(other, raw),
        }
        self.persist();
    }

    /// The debounce window elapsed; decide whether a lookup should start.
    fn debounce_fired(&mut self) -> Option<String> {
        self.status = Status::Hidden;
        let digits = normalize_postal_code(&self.record.zip_code);
        (digits.len() == 8).then_some(digits)
    }

    /// Fold a finished lookup back into the record, unless a newer zip
    /// keystroke made it stale.
    fn finish_lookup(&mut self, generation: u64, outcome: Result<CepAddress, LookupError>) {
        if generation != self.generation {
            debug!("dropping stale lookup response for generation [{generation}]");
            return;
        }
        match outcome {
            Ok(address) => {
                if address.apply_to(&mut self.record) {
                    self.status = Status::Success(MSG_FILLED.to_string());
                }
            }
            Err(LookupError::NotFound) => {
                self.status = Status::Error(MSG_NOT_FOUND.to_string());
            }
            Err(LookupError::Failed(e)) => {
                error!("postal code lookup failed: {e}");
                self.status = Status::Error(MSG_LOOKUP_FAILED.to_string());
            }
        }
        self.persist();
    }

    /// Submit the form. Nothing is persisted while a violation stands; only
    /// the first message in check order is surfaced.
    fn submit(&mut self) {
        self.status = Status::Hidden;
        let errors = validate_record(&mut self.record);
        if let Some(first) = errors.into_iter().next() {
            self.status = Status::Error(first);
            return;
        }
        self.persist();
        self.status = Status::Success(MSG_SAVED.to_string());
    }

    /// Drop the persisted entry and reset the form.
    fn clear(&mut self) {
        if let Err(e) = clear_record(&mut self.store, &mut self.record) {
            error!("cannot clear stored form data: {e:?}");
        }
        self.status = Status::Success(MSG_CLEARED.to_string());
    }

    fn spawn_lookup(
        &mut self,
        cep: String,
        done: mpsc::Sender<(u64, Result<CepAddress, LookupError>)>,
    ) {
        self.status = Status::Success(MSG_LOOKING_UP.to_string());
        let generation = self.generation;
        let lookup = Arc::clone(&self.lookup);
        tokio::spawn(async move {
            let outcome = lookup.lookup(&cep).await;
            let _ = done.send((generation, outcome)).await;
        });
    }

    /// Drive the form until the host closes the event channel.
    ///
    /// Keystroke handling and persistence run inline; only the lookup runs
    /// as a separate task, so events keep flowing while a request is in
    /// flight. Each zip keystroke resets the single debounce timer, and a
    /// reset timer never fires for the superseded keystroke.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<FormEvent>,
        mut on_status: impl FnMut(&Status),
    ) -> Self {
        let (done_tx, mut done_rx) = mpsc::channel(8);

        self.restore();
        if let Some(cep) = self.startup_lookup_cep() {
            self.spawn_lookup(cep, done_tx.clone());
        }
        on_status(&self.status);

        let timer = sleep(DEBOUNCE_WINDOW);
        tokio::pin!(timer);
        let mut armed = false;

        loop {
            let before = self.status.clone();
            tokio::select! {
                event = events.recv() => match event {
                    None => break,
                    Some(FormEvent::Input { field, value }) => {
                        self.apply_input(field, &value);
                        if field == Field::ZipCode {
                            timer.as_mut().reset(Instant::now() + DEBOUNCE_WINDOW);
                            armed = true;
                        }
                    }
                    Some(FormEvent::Submit) => self.submit(),
                    Some(FormEvent::Clear) => self.clear(),
                    Some(FormEvent::Show) => info!("current form: {:?}", self.record),
                },
                () = &mut timer, if armed => {
                    armed = false;
                    if let Some(cep) = self.debounce_fired() {
                        self.spawn_lookup(cep, done_tx.clone());
                    }
                }
                Some((generation, outcome)) = done_rx.recv() => {
                    self.finish_lookup(generation, outcome);
                }
            }
            if self.status != before {
                on_status(&self.status);
            }
        }
        self
    }
}
