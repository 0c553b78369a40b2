//! Carro entity model and DTOs.

use std::fmt;

use concessionaria_core::carro::{
    display_name, format_preco, foto_url, CarroChanges, CarroFields, CarroRepresentation,
};
use concessionaria_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row from the `carros` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Carro {
    pub id: DbId,
    pub marca: String,
    pub modelo: String,
    pub ano: i32,
    pub preco: Decimal,
    /// Photo path relative to the media root, e.g. `carros/<name>.jpg`.
    pub foto: Option<String>,
    pub criado_em: Timestamp,
}

impl Carro {
    /// Build the wire representation, resolving `foto` against `media_url`.
    pub fn to_representation(&self, media_url: &str) -> CarroRepresentation {
        CarroRepresentation {
            id: self.id,
            marca: self.marca.clone(),
            modelo: self.modelo.clone(),
            ano: self.ano,
            preco: format_preco(self.preco),
            foto: self.foto.as_deref().map(|path| foto_url(media_url, path)),
            criado_em: self.criado_em,
        }
    }
}

impl fmt::Display for Carro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_name(&self.marca, &self.modelo))
    }
}

/// DTO for inserting a new carro.
#[derive(Debug, Clone)]
pub struct CreateCarro {
    pub marca: String,
    pub modelo: String,
    pub ano: i32,
    pub preco: Decimal,
    pub foto: Option<String>,
}

impl CreateCarro {
    pub fn new(fields: CarroFields, foto: Option<String>) -> Self {
        Self {
            marca: fields.marca,
            modelo: fields.modelo,
            ano: fields.ano,
            preco: fields.preco,
            foto,
        }
    }
}

/// DTO for updating an existing carro. `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct UpdateCarro {
    pub marca: Option<String>,
    pub modelo: Option<String>,
    pub ano: Option<i32>,
    pub preco: Option<Decimal>,
    /// `Some(None)` clears the photo, `Some(Some(path))` replaces it.
    pub foto: Option<Option<String>>,
}

impl UpdateCarro {
    /// Combine validated field changes with the outcome of any photo upload.
    ///
    /// An uploaded photo wins over a `"foto": null` in the same request.
    pub fn new(changes: CarroChanges, uploaded_foto: Option<String>) -> Self {
        let foto = match (uploaded_foto, changes.clear_foto) {
            (Some(path), _) => Some(Some(path)),
            (None, true) => Some(None),
            (None, false) => None,
        };
        Self {
            marca: changes.marca,
            modelo: changes.modelo,
            ano: changes.ano,
            preco: changes.preco,
            foto,
        }
    }

    /// True when the update replaces or clears the stored photo.
    pub fn touches_foto(&self) -> bool {
        self.foto.is_some()
    }
}
