//! The inquiry form's field values at submission time.

use crate::error::{InquiryError, Result};

/// Every field of the inquiry form, in the order the form shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Service,
    ControllerType,
    Color,
    Timeline,
    DesignDescription,
    ShippingConfirmed,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::Service,
        Field::ControllerType,
        Field::Color,
        Field::Timeline,
        Field::DesignDescription,
        Field::ShippingConfirmed,
    ];

    /// Canonical form key.
    pub fn key(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Service => "service",
            Self::ControllerType => "controller_type",
            Self::Color => "color",
            Self::Timeline => "timeline",
            Self::DesignDescription => "design_description",
            Self::ShippingConfirmed => "shipping_confirm",
        }
    }

    /// Human-readable label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Service => "Service",
            Self::ControllerType => "Controller type",
            Self::Color => "Color",
            Self::Timeline => "Timeline",
            Self::DesignDescription => "Design description",
            Self::ShippingConfirmed => "Shipping confirmation",
        }
    }

    /// Resolve a submitted form key. Hyphens and underscores are interchangeable,
    /// and the older short-form keys (`message`, `shipping-confirm`) still map.
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_lowercase().replace('-', "_");
        let field = match normalized.as_str() {
            "first_name" | "firstname" => Self::FirstName,
            "last_name" | "lastname" => Self::LastName,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "service" | "selected_service" => Self::Service,
            "controller_type" => Self::ControllerType,
            "color" | "colour" => Self::Color,
            "timeline" => Self::Timeline,
            "design_description" | "description" | "message" => Self::DesignDescription,
            "shipping_confirm" | "shipping_confirmed" => Self::ShippingConfirmed,
            _ => return None,
        };
        Some(field)
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Self::Phone | Self::Color | Self::Timeline)
    }
}

/// Form values for one submission attempt. Blank text is stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiryDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub controller_type: Option<String>,
    pub color: Option<String>,
    pub timeline: Option<String>,
    pub design_description: Option<String>,
    pub shipping_confirmed: bool,
}

impl InquiryDraft {
    /// Build a draft from submitted key/value pairs. Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut draft = Self::default();
        for (key, value) in pairs {
            match Field::from_key(key.as_ref()) {
                Some(field) => draft.set(field, value.as_ref()),
                None => tracing::debug!(key = key.as_ref(), "Ignoring unknown form field"),
            }
        }
        draft
    }

    /// Parse a TOML form file with one `key = value` line per field.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(contents)
            .map_err(|e| InquiryError::Config(format!("invalid form file: {e}")))?;

        let pairs = table.into_iter().map(|(key, value)| {
            let text = match value {
                toml::Value::String(s) => s,
                toml::Value::Boolean(b) => b.to_string(),
                other => other.to_string(),
            };
            (key, text)
        });
        Ok(Self::from_pairs(pairs))
    }

    /// Store `value` in `field`. Blank text clears the field.
    pub fn set(&mut self, field: Field, value: &str) {
        if field == Field::ShippingConfirmed {
            self.shipping_confirmed = is_checked(value);
            return;
        }
        let value = Some(value.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        if let Some(slot) = self.text_slot(field) {
            *slot = value;
        }
    }

    /// Text value of `field`, or `None` when absent.
    pub fn get(&self, field: Field) -> Option<&str> {
        let slot = match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Service => &self.service,
            Field::ControllerType => &self.controller_type,
            Field::Color => &self.color,
            Field::Timeline => &self.timeline,
            Field::DesignDescription => &self.design_description,
            Field::ShippingConfirmed => return self.shipping_confirmed.then_some("on"),
        };
        slot.as_deref()
    }

    /// Required fields that are empty, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).is_none())
            .collect()
    }

    /// Requester name as "First Last", skipping absent parts.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    fn text_slot(&mut self, field: Field) -> Option<&mut Option<String>> {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Service => &mut self.service,
            Field::ControllerType => &mut self.controller_type,
            Field::Color => &mut self.color,
            Field::Timeline => &mut self.timeline,
            Field::DesignDescription => &mut self.design_description,
            Field::ShippingConfirmed => return None,
        };
        Some(slot)
    }
}

/// Checkbox semantics: browsers submit "on"; files and flags may say "true"/"yes"/"1".
fn is_checked(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "on" | "true" | "yes" | "1" | "checked"
    )
}
