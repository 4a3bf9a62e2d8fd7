use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four phases of the checkout wizard, traversed front to back.
/// Confirmation is terminal; nothing transitions out of it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    Shipping,
    Payment,
    Review,
    Confirmation,
}

impl Stage {
    /// 1-based position shown in the step indicator.
    pub fn step(&self) -> u8 {
        match self {
            Self::Shipping => 1,
            Self::Payment => 2,
            Self::Review => 3,
            Self::Confirmation => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Payment => "Payment",
            Self::Review => "Review",
            Self::Confirmation => "Confirmation",
        }
    }

    /// Fields that must be non-empty before leaving this stage forward.
    pub fn required_fields(&self) -> &'static [OrderField] {
        match self {
            Self::Shipping => &[OrderField::Name, OrderField::Address],
            Self::Payment => &[OrderField::CardNumber, OrderField::Expiry, OrderField::Cvv],
            Self::Review | Self::Confirmation => &[],
        }
    }

    pub fn missing_fields_message(&self) -> &'static str {
        match self {
            Self::Shipping => "Please fill in the required shipping fields.",
            Self::Payment => "Please fill in the required payment fields.",
            Self::Review | Self::Confirmation => "Please fill in the required fields.",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// The eight known order form keys. Anything else is rejected at the
/// boundary via `FromStr`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderField {
    Name,
    Address,
    City,
    PostalCode,
    Country,
    CardNumber,
    Expiry,
    Cvv,
}

impl OrderField {
    /// Wire name, matching the upstream form schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postalCode",
            Self::Country => "country",
            Self::CardNumber => "cardNumber",
            Self::Expiry => "expiry",
            Self::Cvv => "cvv",
        }
    }
}

impl std::fmt::Display for OrderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown order form field `{0}`")]
pub struct UnknownFieldError(pub String);

impl std::str::FromStr for OrderField {
    type Err = UnknownFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "address" => Ok(Self::Address),
            "city" => Ok(Self::City),
            "postalCode" => Ok(Self::PostalCode),
            "country" => Ok(Self::Country),
            "cardNumber" => Ok(Self::CardNumber),
            "expiry" => Ok(Self::Expiry),
            "cvv" => Ok(Self::Cvv),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// Current input values across all stages. Created empty, overwritten one
/// field at a time, never validated at write time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl OrderForm {
    pub fn set(&mut self, field: OrderField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
    }

    pub fn get(&self, field: OrderField) -> &str {
        match field {
            OrderField::Name => &self.name,
            OrderField::Address => &self.address,
            OrderField::City => &self.city,
            OrderField::PostalCode => &self.postal_code,
            OrderField::Country => &self.country,
            OrderField::CardNumber => &self.card_number,
            OrderField::Expiry => &self.expiry,
            OrderField::Cvv => &self.cvv,
        }
    }

    /// Empty-string check only. A value of spaces counts as filled, the
    /// same as the upstream form's falsiness test.
    pub fn is_blank(&self, field: OrderField) -> bool {
        self.get(field).is_empty()
    }

    /// Last four characters of the card number for the review summary.
    pub fn card_tail(&self) -> &str {
        let tail_start =
            self.card_number.char_indices().rev().nth(3).map(|(index, _)| index).unwrap_or(0);
        &self.card_number[tail_start..]
    }

    fn slot_mut(&mut self, field: OrderField) -> &mut String {
        match field {
            OrderField::Name => &mut self.name,
            OrderField::Address => &mut self.address,
            OrderField::City => &mut self.city,
            OrderField::PostalCode => &mut self.postal_code,
            OrderField::Country => &mut self.country,
            OrderField::CardNumber => &mut self.card_number,
            OrderField::Expiry => &mut self.expiry,
            OrderField::Cvv => &mut self.cvv,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutAction {
    Advance,
    Retreat,
    Complete,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: Stage,
    pub to: Stage,
    pub action: CheckoutAction,
}
