//! `Carro` serializer: field list, input validation and the JSON representation.
//!
//! Writes arrive as a flat JSON object (or the text parts of a multipart form,
//! already folded into one). [`deserialize_create`] and [`deserialize_update`]
//! turn that object into typed values, collecting every problem into a single
//! [`FieldErrors`] map instead of stopping at the first one.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::{CoreError, FieldErrors};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Field list
// ---------------------------------------------------------------------------

pub const FIELD_ID: &str = "id";
pub const FIELD_MARCA: &str = "marca";
pub const FIELD_MODELO: &str = "modelo";
pub const FIELD_ANO: &str = "ano";
pub const FIELD_PRECO: &str = "preco";
pub const FIELD_FOTO: &str = "foto";
pub const FIELD_CRIADO_EM: &str = "criado_em";

/// Every field of a `Carro`, in representation order. Also the `carros` column list.
pub const FIELDS: &[&str] = &[
    FIELD_ID,
    FIELD_MARCA,
    FIELD_MODELO,
    FIELD_ANO,
    FIELD_PRECO,
    FIELD_FOTO,
    FIELD_CRIADO_EM,
];

/// Fields assigned by the system and refused on input.
pub const READ_ONLY_FIELDS: &[&str] = &[FIELD_ID, FIELD_CRIADO_EM];

/// Maximum length of `marca` and `modelo`.
pub const MAX_TEXT_LENGTH: u64 = 100;

/// Total significant digits allowed in `preco`.
pub const PRECO_MAX_DIGITS: u32 = 10;

/// Fractional digits of `preco`, both accepted and emitted.
pub const PRECO_DECIMAL_PLACES: u32 = 2;

/// Sub-directory (under the media root) holding uploaded photos.
pub const FOTO_UPLOAD_DIR: &str = "carros";

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_NULL: &str = "This field may not be null.";
pub const MSG_BLANK: &str = "This field may not be blank.";
pub const MSG_NOT_A_STRING: &str = "Not a valid string.";
pub const MSG_INVALID_INTEGER: &str = "A valid integer is required.";
pub const MSG_INVALID_NUMBER: &str = "A valid number is required.";
pub const MSG_READ_ONLY: &str = "This field is read-only.";
pub const MSG_NOT_A_FILE: &str =
    "The submitted data was not a file. Check the encoding type on the form.";
pub const MSG_INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

// ---------------------------------------------------------------------------
// Validated input
// ---------------------------------------------------------------------------

/// Validated values for a new `Carro`. Every user-writable field is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarroFields {
    pub marca: String,
    pub modelo: String,
    pub ano: i32,
    pub preco: Decimal,
}

/// Validated changes to an existing `Carro`. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct CarroChanges {
    #[validate(length(max = MAX_TEXT_LENGTH))]
    pub marca: Option<String>,
    #[validate(length(max = MAX_TEXT_LENGTH))]
    pub modelo: Option<String>,
    pub ano: Option<i32>,
    pub preco: Option<Decimal>,
    /// `"foto": null` was sent, asking for the current photo to be removed.
    pub clear_foto: bool,
}

impl CarroChanges {
    /// True when the write would not touch any column.
    pub fn is_empty(&self) -> bool {
        self.marca.is_none()
            && self.modelo.is_none()
            && self.ano.is_none()
            && self.preco.is_none()
            && !self.clear_foto
    }
}

impl TryFrom<CarroChanges> for CarroFields {
    type Error = CoreError;

    fn try_from(changes: CarroChanges) -> Result<Self, Self::Error> {
        match (changes.marca, changes.modelo, changes.ano, changes.preco) {
            (Some(marca), Some(modelo), Some(ano), Some(preco)) => Ok(CarroFields {
                marca,
                modelo,
                ano,
                preco,
            }),
            _ => Err(CoreError::Internal(
                "Carro input is missing required fields after validation".into(),
            )),
        }
    }
}

impl From<CarroFields> for CarroChanges {
    fn from(fields: CarroFields) -> Self {
        CarroChanges {
            marca: Some(fields.marca),
            modelo: Some(fields.modelo),
            ano: Some(fields.ano),
            preco: Some(fields.preco),
            clear_foto: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Deserialization
// ---------------------------------------------------------------------------

/// Validate the body of a create request. All writable fields are required.
pub fn deserialize_create(body: &Map<String, Value>) -> Result<CarroFields, CoreError> {
    collect_changes(body, true)?.try_into()
}

/// Validate the body of an update request.
///
/// With `partial` (PATCH) only the keys present are checked; otherwise (PUT)
/// every writable field must be supplied, as on create.
pub fn deserialize_update(
    body: &Map<String, Value>,
    partial: bool,
) -> Result<CarroChanges, CoreError> {
    collect_changes(body, !partial)
}

fn collect_changes(body: &Map<String, Value>, required: bool) -> Result<CarroChanges, CoreError> {
    let mut errors = FieldErrors::new();

    for field in READ_ONLY_FIELDS {
        if body.contains_key(*field) {
            errors.add(field, MSG_READ_ONLY);
        }
    }

    let marca = take_field(body, FIELD_MARCA, required, &mut errors, parse_text);
    let modelo = take_field(body, FIELD_MODELO, required, &mut errors, parse_text);
    let ano = take_field(body, FIELD_ANO, required, &mut errors, parse_ano);
    let preco = take_field(body, FIELD_PRECO, required, &mut errors, parse_preco);

    let clear_foto = match body.get(FIELD_FOTO) {
        None => false,
        Some(Value::Null) => true,
        Some(_) => {
            errors.add(FIELD_FOTO, MSG_NOT_A_FILE);
            false
        }
    };

    let changes = CarroChanges {
        marca,
        modelo,
        ano,
        preco,
        clear_foto,
    };

    if let Err(length_errors) = changes.validate() {
        errors.absorb(&length_errors);
    }

    errors.into_result()?;
    Ok(changes)
}

/// Look up `field`, record `required`/`null` problems, and run `parse` on the value.
fn take_field<T>(
    body: &Map<String, Value>,
    field: &'static str,
    required: bool,
    errors: &mut FieldErrors,
    parse: fn(&Value) -> Result<T, Vec<String>>,
) -> Option<T> {
    match body.get(field) {
        None => {
            if required {
                errors.add(field, MSG_REQUIRED);
            }
            None
        }
        Some(Value::Null) => {
            errors.add(field, MSG_NULL);
            None
        }
        Some(value) => match parse(value) {
            Ok(parsed) => Some(parsed),
            Err(messages) => {
                for message in messages {
                    errors.add(field, message);
                }
                None
            }
        },
    }
}

/// Text fields accept strings and plain numbers; surrounding whitespace is trimmed.
fn parse_text(value: &Value) -> Result<String, Vec<String>> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(vec![MSG_NOT_A_STRING.into()]),
    };
    if text.is_empty() {
        return Err(vec![MSG_BLANK.into()]);
    }
    Ok(text)
}

/// Integers may arrive as JSON numbers or as integer-formatted strings.
fn parse_ano(value: &Value) -> Result<i32, Vec<String>> {
    let wide: i64 = match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => f as i64,
            _ => return Err(vec![MSG_INVALID_INTEGER.into()]),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            // "2010.", "2010.0" and "2010.000" are integers written as decimals.
            let digits = match trimmed.split_once('.') {
                Some((whole, zeros)) if zeros.bytes().all(|b| b == b'0') => whole,
                Some(_) => return Err(vec![MSG_INVALID_INTEGER.into()]),
                None => trimmed,
            };
            digits
                .parse::<i64>()
                .map_err(|_| vec![MSG_INVALID_INTEGER.to_string()])?
        }
        _ => return Err(vec![MSG_INVALID_INTEGER.into()]),
    };

    if wide > i64::from(i32::MAX) {
        return Err(vec![format!(
            "Ensure this value is less than or equal to {}.",
            i32::MAX
        )]);
    }
    if wide < i64::from(i32::MIN) {
        return Err(vec![format!(
            "Ensure this value is greater than or equal to {}.",
            i32::MIN
        )]);
    }
    Ok(wide as i32)
}

/// Decimals may arrive as strings (preferred, exact) or JSON numbers.
fn parse_preco(value: &Value) -> Result<Decimal, Vec<String>> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(vec![MSG_INVALID_NUMBER.into()]),
    };
    if !is_decimal_literal(&raw) {
        return Err(vec![MSG_INVALID_NUMBER.into()]);
    }
    let preco = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| vec![MSG_INVALID_NUMBER.to_string()])?;
    validate_preco_precision(&preco)?;
    Ok(preco)
}

/// Sign, digits, at most one point and an optional exponent. No digit separators.
fn is_decimal_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let mantissa_ok = mantissa.bytes().any(|b| b.is_ascii_digit())
        && mantissa.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && mantissa.bytes().filter(|&b| b == b'.').count() <= 1;
    let exponent_ok = exponent.is_none_or(|e| {
        let digits = e.strip_prefix(['+', '-']).unwrap_or(e);
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    });
    mantissa_ok && exponent_ok
}

/// Enforce `max_digits = 10, decimal_places = 2` on the value as written.
///
/// Trailing zeros count: `"1.500"` has three decimal places and is rejected.
pub fn validate_preco_precision(preco: &Decimal) -> Result<(), Vec<String>> {
    let decimals = preco.scale();
    let mantissa_digits = preco.mantissa().unsigned_abs().to_string().len() as u32;
    let digits = mantissa_digits.max(decimals);
    let whole_digits = digits - decimals;
    let max_whole_digits = PRECO_MAX_DIGITS - PRECO_DECIMAL_PLACES;

    let mut messages = Vec::new();
    if digits > PRECO_MAX_DIGITS {
        messages.push(format!(
            "Ensure that there are no more than {PRECO_MAX_DIGITS} digits in total."
        ));
    }
    if decimals > PRECO_DECIMAL_PLACES {
        messages.push(format!(
            "Ensure that there are no more than {PRECO_DECIMAL_PLACES} decimal places."
        ));
    }
    if whole_digits > max_whole_digits {
        messages.push(format!(
            "Ensure that there are no more than {max_whole_digits} digits before the decimal point."
        ));
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(messages)
    }
}

// ---------------------------------------------------------------------------
// Representation
// ---------------------------------------------------------------------------

/// The JSON shape of a `Carro` as returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarroRepresentation {
    pub id: DbId,
    pub marca: String,
    pub modelo: String,
    pub ano: i32,
    /// Always exactly two fractional digits, e.g. `"19999.90"`.
    pub preco: String,
    /// Public URL of the stored photo, `null` when there is none.
    pub foto: Option<String>,
    pub criado_em: Timestamp,
}

/// Render a price with exactly [`PRECO_DECIMAL_PLACES`] fractional digits.
pub fn format_preco(preco: Decimal) -> String {
    let mut scaled = preco.round_dp(PRECO_DECIMAL_PLACES);
    scaled.rescale(PRECO_DECIMAL_PLACES);
    scaled.to_string()
}

/// Join the configured media URL prefix and a stored relative photo path.
pub fn foto_url(media_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Human-readable label for a car: `"<marca> <modelo>"`.
pub fn display_name(marca: &str, modelo: &str) -> String {
    format!("{marca} {modelo}")
}
