//! Company request validation and binding
//!
//! The list fields arrive as JSON arrays, as strings holding a JSON array
//! (form bodies), or not at all. They are converted with
//! [`orderly_shared::codec`] and stored encoded.

use orderly_shared::codec::{encode_list, list_from_value};
use orderly_shared::models::company::{CreateCompany, UpdateCompany};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use super::FieldCheck;
use crate::error::ApiResult;
use crate::extract::Envelope;

/// Body of `POST /company/create`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub company_name: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub merchant_url: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub date_of_incorporation: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub company_reg_number: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub country_of_incorporation: String,

    #[serde(default)]
    #[validate(email(message = "must be a valid email address"), length(max = 100))]
    pub company_email: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub contact_person_full_name: String,

    #[serde(default)]
    #[validate(length(max = 20))]
    pub contact_person_telephone: String,

    #[serde(default)]
    #[validate(email(message = "must be a valid email address"), length(max = 100))]
    pub contact_person_email: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub business_description: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub company_source_of_funds: String,

    #[serde(default)]
    #[validate(length(max = 255))]
    pub business_relationship_purpose: String,

    pub is_licensed: Option<bool>,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub bank_name: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub swift_code: String,

    pub target_markets: Option<Value>,
    pub countries_of_operation: Option<Value>,
    pub previously_used_payment_gateways: Option<Value>,
}

impl Envelope for CreateCompanyRequest {
    const KEYS: &'static [&'static str] = &["company", "Company"];
}

impl CreateCompanyRequest {
    /// Validates scalar fields, then encodes the list fields
    ///
    /// # Errors
    ///
    /// - `ApiError::Validation` for scalar field violations
    /// - `ApiError::Encoding` naming the first list field that is not a
    ///   list of strings
    pub fn bind(self) -> ApiResult<CreateCompany> {
        let mut check = FieldCheck::of(&self);
        for (field, value) in [
            ("company_name", &self.company_name),
            ("merchant_url", &self.merchant_url),
            ("date_of_incorporation", &self.date_of_incorporation),
            ("company_reg_number", &self.company_reg_number),
            ("country_of_incorporation", &self.country_of_incorporation),
            ("contact_person_full_name", &self.contact_person_full_name),
            ("contact_person_telephone", &self.contact_person_telephone),
            ("business_description", &self.business_description),
            ("company_source_of_funds", &self.company_source_of_funds),
            ("business_relationship_purpose", &self.business_relationship_purpose),
            ("bank_name", &self.bank_name),
            ("swift_code", &self.swift_code),
        ] {
            check.filled(field, value);
        }
        check.require("is_licensed", &self.is_licensed);
        check.finish()?;

        Ok(CreateCompany {
            target_markets: encode_field("target_markets", self.target_markets.as_ref())?,
            countries_of_operation: encode_field(
                "countries_of_operation",
                self.countries_of_operation.as_ref(),
            )?,
            previously_used_payment_gateways: encode_field(
                "previously_used_payment_gateways",
                self.previously_used_payment_gateways.as_ref(),
            )?,
            company_name: self.company_name,
            merchant_url: self.merchant_url,
            date_of_incorporation: self.date_of_incorporation,
            company_reg_number: self.company_reg_number,
            country_of_incorporation: self.country_of_incorporation,
            company_email: self.company_email,
            contact_person_full_name: self.contact_person_full_name,
            contact_person_telephone: self.contact_person_telephone,
            contact_person_email: self.contact_person_email,
            business_description: self.business_description,
            company_source_of_funds: self.company_source_of_funds,
            business_relationship_purpose: self.business_relationship_purpose,
            is_licensed: self.is_licensed.unwrap_or_default(),
            bank_name: self.bank_name,
            swift_code: self.swift_code,
        })
    }
}

/// Body of `PUT /company/update/:id`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 255))]
    pub company_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub merchant_url: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub date_of_incorporation: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub company_reg_number: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub country_of_incorporation: Option<String>,

    #[validate(email(message = "must be a valid email address"), length(max = 100))]
    pub company_email: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub contact_person_full_name: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub contact_person_telephone: Option<String>,

    #[validate(email(message = "must be a valid email address"), length(max = 100))]
    pub contact_person_email: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub business_description: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub company_source_of_funds: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub business_relationship_purpose: Option<String>,

    pub is_licensed: Option<bool>,

    #[validate(length(min = 1, max = 100))]
    pub bank_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub swift_code: Option<String>,

    pub target_markets: Option<Value>,
    pub countries_of_operation: Option<Value>,
    pub previously_used_payment_gateways: Option<Value>,
}

impl Envelope for UpdateCompanyRequest {
    const KEYS: &'static [&'static str] = &["company", "Company"];
}

impl UpdateCompanyRequest {
    pub fn bind(self) -> ApiResult<UpdateCompany> {
        FieldCheck::of(&self).finish()?;

        Ok(UpdateCompany {
            target_markets: encode_present("target_markets", self.target_markets.as_ref())?,
            countries_of_operation: encode_present(
                "countries_of_operation",
                self.countries_of_operation.as_ref(),
            )?,
            previously_used_payment_gateways: encode_present(
                "previously_used_payment_gateways",
                self.previously_used_payment_gateways.as_ref(),
            )?,
            company_name: self.company_name,
            merchant_url: self.merchant_url,
            date_of_incorporation: self.date_of_incorporation,
            company_reg_number: self.company_reg_number,
            country_of_incorporation: self.country_of_incorporation,
            company_email: self.company_email,
            contact_person_full_name: self.contact_person_full_name,
            contact_person_telephone: self.contact_person_telephone,
            contact_person_email: self.contact_person_email,
            business_description: self.business_description,
            company_source_of_funds: self.company_source_of_funds,
            business_relationship_purpose: self.business_relationship_purpose,
            is_licensed: self.is_licensed,
            bank_name: self.bank_name,
            swift_code: self.swift_code,
        })
    }
}

fn encode_field(field: &'static str, value: Option<&Value>) -> ApiResult<String> {
    let list = list_from_value(field, value)?;
    Ok(encode_list(field, &list)?)
}

// Absent stays absent so the stored list is kept
fn encode_present(field: &'static str, value: Option<&Value>) -> ApiResult<Option<String>> {
    value.map(|v| encode_field(field, Some(v))).transpose()
}
