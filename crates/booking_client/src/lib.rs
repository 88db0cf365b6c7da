use std::{future::Future, sync::Arc, time::Duration};

use shared::domain::{DoctorId, SpecialtyId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub mod config;
pub mod controls;
pub mod error;
pub mod transport;
pub mod types;

pub use controls::{FormControls, InputControl, MemoryControls, SelectControl};
pub use error::{BookingError, ErrorKind};
pub use transport::{BookingService, HttpBookingService, MissingBookingService};
pub use types::{FormState, Outcome, SelectOption};

use types::{DEFAULT_NO_SLOTS_LABEL, DEFAULT_PLACEHOLDER_LABEL};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub request_timeout: Duration,
    pub placeholder_label: String,
    pub no_slots_label: String,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            placeholder_label: DEFAULT_PLACEHOLDER_LABEL.to_string(),
            no_slots_label: DEFAULT_NO_SLOTS_LABEL.to_string(),
        }
    }
}

struct ControllerState {
    form: FormState,
    next_seq: u64,
    latest_doctors_seq: u64,
    latest_slots_seq: u64,
}

impl ControllerState {
    fn issue_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Cascading specialty → doctor → date → time form.
///
/// Every upstream change clears and disables the fields below it and
/// invalidates their outstanding lookups; only the response to the most
/// recently issued lookup for a field is ever rendered. The state lock is
/// never held across a remote call, so handlers may be interleaved.
pub struct BookingFormController {
    service: Arc<dyn BookingService>,
    controls: FormControls,
    options: ControllerOptions,
    inner: Mutex<ControllerState>,
}

impl BookingFormController {
    pub fn new(
        service: Arc<dyn BookingService>,
        controls: FormControls,
        options: ControllerOptions,
    ) -> Self {
        let controller = Self {
            service,
            controls,
            options,
            inner: Mutex::new(ControllerState {
                form: FormState::default(),
                next_seq: 0,
                latest_doctors_seq: 0,
                latest_slots_seq: 0,
            }),
        };
        controller.render_doctor_reset();
        controller.controls.date.set_enabled(false);
        controller.render_time_reset();
        controller
    }

    pub async fn state(&self) -> FormState {
        self.inner.lock().await.form.clone()
    }

    pub async fn on_specialty_change(&self, specialty_id: &str) -> Result<Outcome, BookingError> {
        let specialty = SpecialtyId::parse(specialty_id);
        let (specialty, seq) = {
            let mut state = self.inner.lock().await;
            state.form.specialty_id = specialty.clone();
            self.reset_doctor(&mut state);
            let seq = state.issue_seq();
            state.latest_doctors_seq = seq;
            match specialty {
                Some(specialty) => (specialty, seq),
                None => {
                    debug!("booking: specialty cleared, doctor lookup skipped");
                    return Ok(Outcome::Reset);
                }
            }
        };

        debug!("booking: requesting doctors specialty={} seq={}", specialty, seq);
        let result = self
            .bounded(self.service.list_doctors(&specialty, seq))
            .await;

        let mut state = self.inner.lock().await;
        if state.latest_doctors_seq != seq {
            debug!(
                "booking: discarding stale doctor list specialty={} seq={} latest={}",
                specialty, seq, state.latest_doctors_seq
            );
            return Ok(Outcome::Superseded);
        }

        match result {
            Ok(doctors) => {
                let mut options = Vec::with_capacity(doctors.len() + 1);
                options.push(SelectOption::placeholder(&self.options.placeholder_label));
                options.extend(doctors.iter().map(SelectOption::from));

                self.controls.doctor.replace_options(&options);
                self.controls.doctor.set_error(None);
                self.controls.doctor.set_enabled(true);
                state.form.doctor_error = None;
                state.form.doctor_enabled = true;
                info!(
                    "booking: doctor selector populated specialty={} doctors={}",
                    specialty,
                    doctors.len()
                );
                Ok(Outcome::Populated { options })
            }
            Err(err) => {
                warn!("booking: doctor lookup failed specialty={}: {}", specialty, err);
                let indicator = err.indicator();
                self.controls.doctor.set_error(Some(&indicator));
                state.form.doctor_error = Some(indicator);
                Err(err)
            }
        }
    }

    pub async fn on_doctor_change(&self, doctor_id: &str) -> Result<Outcome, BookingError> {
        let doctor = DoctorId::parse(doctor_id);
        let mut state = self.inner.lock().await;
        if !state.form.doctor_enabled {
            debug!("booking: doctor changed while selector is locked, ignored");
            return Ok(Outcome::Skipped);
        }
        state.form.doctor_id = doctor.clone();
        self.reset_date(&mut state);

        match doctor {
            Some(doctor) => {
                self.controls.date.set_enabled(true);
                state.form.date_enabled = true;
                debug!("booking: date field enabled doctor={}", doctor);
                Ok(Outcome::Enabled)
            }
            None => Ok(Outcome::Reset),
        }
    }

    pub async fn on_date_change(&self, date: &str) -> Result<Outcome, BookingError> {
        let (doctor, date, seq) = {
            let mut state = self.inner.lock().await;
            let Some(doctor) = state.form.doctor_id.clone() else {
                debug!("booking: date changed without a doctor, slot lookup skipped");
                return Ok(Outcome::Skipped);
            };
            let date = Some(date.trim())
                .filter(|date| !date.is_empty())
                .map(str::to_string);
            state.form.date = date.clone();
            self.reset_time(&mut state);
            let Some(date) = date else {
                return Ok(Outcome::Reset);
            };
            let seq = state.issue_seq();
            state.latest_slots_seq = seq;
            (doctor, date, seq)
        };

        debug!(
            "booking: requesting slots doctor={} date={} seq={}",
            doctor, date, seq
        );
        let result = self
            .bounded(self.service.list_slots(&doctor, &date, seq))
            .await;

        let mut state = self.inner.lock().await;
        if state.latest_slots_seq != seq {
            debug!(
                "booking: discarding stale slot list doctor={} date={} seq={} latest={}",
                doctor, date, seq, state.latest_slots_seq
            );
            return Ok(Outcome::Superseded);
        }

        match result {
            Ok(slots) => {
                let available: Vec<_> = slots.iter().filter(|slot| slot.available).collect();
                let options = if available.is_empty() {
                    vec![SelectOption::unavailable(&self.options.no_slots_label)]
                } else {
                    let mut options = Vec::with_capacity(available.len() + 1);
                    options.push(SelectOption::placeholder(&self.options.placeholder_label));
                    options.extend(available.iter().map(|slot| SelectOption::from(*slot)));
                    options
                };

                self.controls.time.replace_options(&options);
                self.controls.time.set_error(None);
                self.controls.time.set_enabled(true);
                state.form.time_error = None;
                state.form.time_enabled = true;
                info!(
                    "booking: time selector populated doctor={} date={} slots={}",
                    doctor,
                    date,
                    available.len()
                );
                Ok(Outcome::Populated { options })
            }
            Err(err) => {
                warn!(
                    "booking: slot lookup failed doctor={} date={}: {}",
                    doctor, date, err
                );
                let indicator = err.indicator();
                self.controls.time.set_error(Some(&indicator));
                state.form.time_error = Some(indicator);
                Err(err)
            }
        }
    }

    /// Records the chosen slot token; ignored while the time selector is locked.
    pub async fn on_time_change(&self, time: &str) -> Outcome {
        let mut state = self.inner.lock().await;
        if !state.form.time_enabled {
            return Outcome::Skipped;
        }
        state.form.time = Some(time.trim())
            .filter(|time| !time.is_empty())
            .map(str::to_string);
        Outcome::Selected
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, BookingError>>,
    ) -> Result<T, BookingError> {
        match tokio::time::timeout(self.options.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(BookingError::Timeout(self.options.request_timeout)),
        }
    }

    fn reset_doctor(&self, state: &mut ControllerState) {
        state.form.doctor_id = None;
        state.form.doctor_enabled = false;
        state.form.doctor_error = None;
        self.render_doctor_reset();
        self.reset_date(state);
    }

    fn reset_date(&self, state: &mut ControllerState) {
        state.form.date = None;
        state.form.date_enabled = false;
        self.controls.date.clear();
        self.controls.date.set_enabled(false);
        self.reset_time(state);
    }

    fn reset_time(&self, state: &mut ControllerState) {
        state.form.time = None;
        state.form.time_enabled = false;
        state.form.time_error = None;
        state.latest_slots_seq = state.issue_seq();
        self.render_time_reset();
    }

    fn render_doctor_reset(&self) {
        self.controls
            .doctor
            .replace_options(&[SelectOption::placeholder(&self.options.placeholder_label)]);
        self.controls.doctor.set_error(None);
        self.controls.doctor.set_enabled(false);
    }

    fn render_time_reset(&self) {
        self.controls
            .time
            .replace_options(&[SelectOption::placeholder(&self.options.placeholder_label)]);
        self.controls.time.set_error(None);
        self.controls.time.set_enabled(false);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
