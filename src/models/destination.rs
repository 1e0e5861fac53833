use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::submitted;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Destination {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DestinationForm {
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDestination {
    pub id: Uuid,
    pub name: String,
}

impl NewDestination {
    pub fn from_form(form: &DestinationForm) -> Result<NewDestination, AppError> {
        let Some(name) = submitted(&form.name) else {
            return Err(AppError::MissingFields);
        };
        Ok(NewDestination {
            id: Uuid::new_v4(),
            name: name.to_owned(),
        })
    }
}
