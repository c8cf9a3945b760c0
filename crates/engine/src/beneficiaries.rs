//! Beneficiaries table and the `Beneficiary` domain type.
//!
//! A beneficiary is a saved transfer target owned by exactly one user. Its
//! phone may or may not belong to a registered user; the transfer workflow
//! decides at send time whether the credit lands on-ledger.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "beneficiaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub relationship: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Beneficiary> for ActiveModel {
    fn from(value: &Beneficiary) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            email: ActiveValue::Set(value.email.clone()),
            account_number: ActiveValue::Set(value.account_number.clone()),
            bank_name: ActiveValue::Set(value.bank_name.clone()),
            relationship: ActiveValue::Set(value.relationship.clone()),
        }
    }
}

impl TryFrom<Model> for Beneficiary {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id).map_err(|_| {
                EngineError::BeneficiaryNotFound("invalid beneficiary id".to_string())
            })?,
            user_id: Uuid::parse_str(&model.user_id).map_err(|_| {
                EngineError::BeneficiaryNotFound("invalid beneficiary owner".to_string())
            })?,
            name: model.name,
            phone: model.phone,
            email: model.email,
            account_number: model.account_number,
            bank_name: model.bank_name,
            relationship: model.relationship,
        })
    }
}
