use actix_web::web::Bytes;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Technician {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub cashapp_qr: Option<String>,
    pub venmo_qr: Option<String>,
    pub zelle_qr: Option<String>,
}

impl Technician {
    /// A record that has not been inserted yet; `id` is assigned by the database.
    pub fn draft(name: String) -> Self {
        Self {
            id: 0,
            name,
            image: None,
            cashapp_qr: None,
            venmo_qr: None,
            zelle_qr: None,
        }
    }

    pub fn file(&self, slot: FileSlot) -> Option<&str> {
        match slot {
            FileSlot::Image => self.image.as_deref(),
            FileSlot::CashappQr => self.cashapp_qr.as_deref(),
            FileSlot::VenmoQr => self.venmo_qr.as_deref(),
            FileSlot::ZelleQr => self.zelle_qr.as_deref(),
        }
    }

    fn file_mut(&mut self, slot: FileSlot) -> &mut Option<String> {
        match slot {
            FileSlot::Image => &mut self.image,
            FileSlot::CashappQr => &mut self.cashapp_qr,
            FileSlot::VenmoQr => &mut self.venmo_qr,
            FileSlot::ZelleQr => &mut self.zelle_qr,
        }
    }

    pub fn set_file(&mut self, slot: FileSlot, reference: Option<String>) {
        *self.file_mut(slot) = reference;
    }

    /// Clears the slot and hands back whatever it referenced.
    pub fn take_file(&mut self, slot: FileSlot) -> Option<String> {
        self.file_mut(slot).take()
    }
}

/// One of the four optional file references of a technician.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileSlot {
    Image,
    CashappQr,
    VenmoQr,
    ZelleQr,
}

impl FileSlot {
    pub const ALL: [FileSlot; 4] = [
        FileSlot::Image,
        FileSlot::CashappQr,
        FileSlot::VenmoQr,
        FileSlot::ZelleQr,
    ];

    /// Multipart field name used by the admin form.
    pub fn form_field(self) -> &'static str {
        match self {
            FileSlot::Image => "technicianImage",
            FileSlot::CashappQr => "cashappQR",
            FileSlot::VenmoQr => "venmoQR",
            FileSlot::ZelleQr => "zelleQR",
        }
    }

    pub fn from_form_field(field: &str) -> Option<FileSlot> {
        FileSlot::ALL
            .into_iter()
            .find(|slot| slot.form_field() == field)
    }

    fn index(self) -> usize {
        match self {
            FileSlot::Image => 0,
            FileSlot::CashappQr => 1,
            FileSlot::VenmoQr => 2,
            FileSlot::ZelleQr => 3,
        }
    }
}

/// A file received in a multipart request, still in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub original_name: String,
    pub data: Bytes,
}

/// What a request asks to happen to a single file slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FileDirective {
    #[default]
    Keep,
    Replace(Upload),
    Clear,
}

/// Decoded body of a create or update request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnicianForm {
    pub name: Option<String>,
    directives: [FileDirective; 4],
}

impl TechnicianForm {
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn directive(&self, slot: FileSlot) -> &FileDirective {
        &self.directives[slot.index()]
    }

    pub fn set_directive(&mut self, slot: FileSlot, directive: FileDirective) {
        self.directives[slot.index()] = directive;
    }

    pub fn take_directive(&mut self, slot: FileSlot) -> FileDirective {
        std::mem::take(&mut self.directives[slot.index()])
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TechnicianList {
    pub technicians: Vec<Technician>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TechnicianEnvelope {
    pub technician: Technician,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianCreated {
    pub technician_id: i64,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RowsAffected {
    pub message: String,
    pub rows_affected: u64,
}

#[derive(Deserialize, Debug)]
pub struct AccessCode {
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AccessVerdict {
    pub success: bool,
}
