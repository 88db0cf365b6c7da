use shared::domain::{Doctor, DoctorId, Slot, SpecialtyId};

pub const DEFAULT_PLACEHOLDER_LABEL: &str = "-- Seleccione --";
pub const DEFAULT_NO_SLOTS_LABEL: &str = "No hay horarios disponibles";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl SelectOption {
    /// Selectable "no selection" entry.
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Non-selectable explanatory entry with an empty value.
    pub fn unavailable(label: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            label: label.into(),
            disabled: true,
        }
    }
}

impl From<&Doctor> for SelectOption {
    fn from(doctor: &Doctor) -> Self {
        Self {
            value: doctor.id.to_string(),
            label: doctor.name.clone(),
            disabled: false,
        }
    }
}

impl From<&Slot> for SelectOption {
    fn from(slot: &Slot) -> Self {
        Self {
            value: slot.datetime.clone(),
            label: slot.time.clone(),
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub specialty_id: Option<SpecialtyId>,
    pub doctor_id: Option<DoctorId>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub doctor_enabled: bool,
    pub date_enabled: bool,
    pub time_enabled: bool,
    pub doctor_error: Option<String>,
    pub time_error: Option<String>,
}

impl FormState {
    pub fn check_invariants(&self) -> bool {
        (!self.doctor_enabled || self.specialty_id.is_some())
            && (!self.date_enabled || self.doctor_id.is_some())
            && (!self.time_enabled || (self.doctor_id.is_some() && self.date.is_some()))
    }
}

/// What a handler did with the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A selector received fresh options and was enabled.
    Populated { options: Vec<SelectOption> },
    /// A downstream field was unlocked without a remote call.
    Enabled,
    /// A value was recorded without touching other fields.
    Selected,
    /// Downstream fields were cleared and disabled.
    Reset,
    /// An upstream value is missing, nothing changed.
    Skipped,
    /// A newer request for the same field was issued before this one finished.
    Superseded,
}
