//! Company model and database operations
//!
//! The three list-valued columns (`target_markets`, `countries_of_operation`,
//! `previously_used_payment_gateways`) hold JSON-encoded text. This module
//! stores and returns that text as is; encoding and decoding go through
//! [`crate::codec`].

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::ListParams;
use crate::db::gateway::{self, Record};
use crate::error::{StoreError, StoreResult};

const COLUMNS: &str = "id, company_name, merchant_url, date_of_incorporation, \
    company_reg_number, country_of_incorporation, company_email, \
    contact_person_full_name, contact_person_telephone, contact_person_email, \
    business_description, company_source_of_funds, business_relationship_purpose, \
    is_licensed, bank_name, swift_code, target_markets, countries_of_operation, \
    previously_used_payment_gateways, created_at, updated_at";

/// Merchant company onboarding record
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Company {
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

    /// Encoded list, see [`crate::codec::decode_list`]
    pub target_markets: String,

    /// Encoded list
    pub countries_of_operation: String,

    /// Encoded list
    pub previously_used_payment_gateways: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Company {
    const TABLE: &'static str = "companies";
    const ENTITY: &'static str = "company";
}

/// Input for creating a company
///
/// List fields must already be encoded with [`crate::codec::encode_list`].
#[derive(Debug, Clone)]
pub struct CreateCompany {
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
    pub target_markets: String,
    pub countries_of_operation: String,
    pub previously_used_payment_gateways: String,
}

/// Partial update for a company
///
/// List fields, when present, are encoded text like in [`CreateCompany`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCompany {
    pub company_name: Option<String>,
    pub merchant_url: Option<String>,
    pub date_of_incorporation: Option<String>,
    pub company_reg_number: Option<String>,
    pub country_of_incorporation: Option<String>,
    pub company_email: Option<String>,
    pub contact_person_full_name: Option<String>,
    pub contact_person_telephone: Option<String>,
    pub contact_person_email: Option<String>,
    pub business_description: Option<String>,
    pub company_source_of_funds: Option<String>,
    pub business_relationship_purpose: Option<String>,
    pub is_licensed: Option<bool>,
    pub bank_name: Option<String>,
    pub swift_code: Option<String>,
    pub target_markets: Option<String>,
    pub countries_of_operation: Option<String>,
    pub previously_used_payment_gateways: Option<String>,
}

impl UpdateCompany {
    /// Whether the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Company {
    /// Inserts a new company
    pub async fn create(pool: &PgPool, data: CreateCompany) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO companies (
                company_name, merchant_url, date_of_incorporation, company_reg_number,
                country_of_incorporation, company_email, contact_person_full_name,
                contact_person_telephone, contact_person_email, business_description,
                company_source_of_funds, business_relationship_purpose, is_licensed,
                bank_name, swift_code, target_markets, countries_of_operation,
                previously_used_payment_gateways
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, Company>(&query)
            .bind(data.company_name)
            .bind(data.merchant_url)
            .bind(data.date_of_incorporation)
            .bind(data.company_reg_number)
            .bind(data.country_of_incorporation)
            .bind(data.company_email)
            .bind(data.contact_person_full_name)
            .bind(data.contact_person_telephone)
            .bind(data.contact_person_email)
            .bind(data.business_description)
            .bind(data.company_source_of_funds)
            .bind(data.business_relationship_purpose)
            .bind(data.is_licensed)
            .bind(data.bank_name)
            .bind(data.swift_code)
            .bind(data.target_markets)
            .bind(data.countries_of_operation)
            .bind(data.previously_used_payment_gateways)
            .fetch_one(pool)
            .await
    }

    /// Finds a company by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");

        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Loads a company by ID, failing with [`StoreError::NotFound`] if absent
    pub async fn get(pool: &PgPool, id: Uuid) -> StoreResult<Self> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: Self::ENTITY,
                id,
            })
    }

    /// Lists companies, oldest first
    pub async fn list(pool: &PgPool, params: ListParams) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies ORDER BY created_at, id LIMIT $1 OFFSET $2"
        );

        sqlx::query_as::<_, Company>(&query)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    /// Applies a patch
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the company does not exist
    /// - [`StoreError::NoRowsAffected`] if the patch is empty or changes nothing
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateCompany) -> StoreResult<Self> {
        if data.is_empty() {
            return Err(gateway::classify_missed_update::<Self>(pool, id).await);
        }

        let query = format!(
            r#"
            UPDATE companies SET
                company_name = COALESCE($2, company_name),
                merchant_url = COALESCE($3, merchant_url),
                date_of_incorporation = COALESCE($4, date_of_incorporation),
                company_reg_number = COALESCE($5, company_reg_number),
                country_of_incorporation = COALESCE($6, country_of_incorporation),
                company_email = COALESCE($7, company_email),
                contact_person_full_name = COALESCE($8, contact_person_full_name),
                contact_person_telephone = COALESCE($9, contact_person_telephone),
                contact_person_email = COALESCE($10, contact_person_email),
                business_description = COALESCE($11, business_description),
                company_source_of_funds = COALESCE($12, company_source_of_funds),
                business_relationship_purpose = COALESCE($13, business_relationship_purpose),
                is_licensed = COALESCE($14, is_licensed),
                bank_name = COALESCE($15, bank_name),
                swift_code = COALESCE($16, swift_code),
                target_markets = COALESCE($17, target_markets),
                countries_of_operation = COALESCE($18, countries_of_operation),
                previously_used_payment_gateways = COALESCE($19, previously_used_payment_gateways),
                updated_at = NOW()
            WHERE id = $1
              AND (company_name, merchant_url, date_of_incorporation, company_reg_number,
                   country_of_incorporation, company_email, contact_person_full_name,
                   contact_person_telephone, contact_person_email, business_description,
                   company_source_of_funds, business_relationship_purpose, is_licensed,
                   bank_name, swift_code, target_markets, countries_of_operation,
                   previously_used_payment_gateways)
                  IS DISTINCT FROM
                  (COALESCE($2, company_name), COALESCE($3, merchant_url),
                   COALESCE($4, date_of_incorporation), COALESCE($5, company_reg_number),
                   COALESCE($6, country_of_incorporation), COALESCE($7, company_email),
                   COALESCE($8, contact_person_full_name), COALESCE($9, contact_person_telephone),
                   COALESCE($10, contact_person_email), COALESCE($11, business_description),
                   COALESCE($12, company_source_of_funds),
                   COALESCE($13, business_relationship_purpose), COALESCE($14, is_licensed),
                   COALESCE($15, bank_name), COALESCE($16, swift_code),
                   COALESCE($17, target_markets), COALESCE($18, countries_of_operation),
                   COALESCE($19, previously_used_payment_gateways))
            RETURNING {COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(data.company_name)
            .bind(data.merchant_url)
            .bind(data.date_of_incorporation)
            .bind(data.company_reg_number)
            .bind(data.country_of_incorporation)
            .bind(data.company_email)
            .bind(data.contact_person_full_name)
            .bind(data.contact_person_telephone)
            .bind(data.contact_person_email)
            .bind(data.business_description)
            .bind(data.company_source_of_funds)
            .bind(data.business_relationship_purpose)
            .bind(data.is_licensed)
            .bind(data.bank_name)
            .bind(data.swift_code)
            .bind(data.target_markets)
            .bind(data.countries_of_operation)
            .bind(data.previously_used_payment_gateways)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(company) => Ok(company),
            None => Err(gateway::classify_missed_update::<Self>(pool, id).await),
        }
    }

    /// Permanently deletes a company
    pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<()> {
        gateway::delete::<Self>(pool, id).await
    }
}
