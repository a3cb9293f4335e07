//! Company response view
//!
//! The stored list columns are decoded back into arrays. A column that no
//! longer decodes is reported as a corrupt record rather than an empty list.

use chrono::{DateTime, Utc};
use orderly_shared::codec::decode_list;
use orderly_shared::models::company::Company;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Company as returned to clients, with list fields decoded
#[derive(Debug, Clone, Serialize)]
pub struct CompanyView {
    pub id: Uuid,
    pub company_name: String,
    pub merchant_url: String,
    pub date_of_incorporation: String,
    pub company_reg_number: String,
    pub country_of_incorporation: String,
    pub company_email: String,
    pub contact_person_full_name: String,
    pub contact_person_telephone: String,
    pub contact_person_email: String,
    pub business_description: String,
    pub company_source_of_funds: String,
    pub business_relationship_purpose: String,
    pub is_licensed: bool,
    pub bank_name: String,
    pub swift_code: String,
    pub target_markets: Vec<String>,
    pub countries_of_operation: Vec<String>,
    pub previously_used_payment_gateways: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Company> for CompanyView {
    type Error = ApiError;

    /// Fails with `CorruptRecord` if a stored list is not valid
    fn try_from(company: &Company) -> Result<Self, Self::Error> {
        let decode = |field, stored: &str| decode_list(field, stored).map_err(ApiError::CorruptRecord);

        Ok(Self {
            id: company.id,
            company_name: company.company_name.clone(),
            merchant_url: company.merchant_url.clone(),
            date_of_incorporation: company.date_of_incorporation.clone(),
            company_reg_number: company.company_reg_number.clone(),
            country_of_incorporation: company.country_of_incorporation.clone(),
            company_email: company.company_email.clone(),
            contact_person_full_name: company.contact_person_full_name.clone(),
            contact_person_telephone: company.contact_person_telephone.clone(),
            contact_person_email: company.contact_person_email.clone(),
            business_description: company.business_description.clone(),
            company_source_of_funds: company.company_source_of_funds.clone(),
            business_relationship_purpose: company.business_relationship_purpose.clone(),
            is_licensed: company.is_licensed,
            bank_name: company.bank_name.clone(),
            swift_code: company.swift_code.clone(),
            target_markets: decode("target_markets", &company.target_markets)?,
            countries_of_operation: decode("countries_of_operation", &company.countries_of_operation)?,
            previously_used_payment_gateways: decode(
                "previously_used_payment_gateways",
                &company.previously_used_payment_gateways,
            )?,
            created_at: company.created_at,
            updated_at: company.updated_at,
        })
    }
}

impl CompanyView {
    /// Views for `companies`, in the same order; the first corrupt record fails the batch
    pub fn many(companies: &[Company]) -> Result<Vec<Self>, ApiError> {
        companies.iter().map(Self::try_from).collect()
    }
}
