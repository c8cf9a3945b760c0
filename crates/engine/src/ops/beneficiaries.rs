//! Saved transfer targets.
//!
//! A beneficiary belongs exclusively to the user who added it; every lookup
//! here filters on the owner so one user can never address another user's
//! list.

use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Beneficiary, EngineError, NewBeneficiary, ResultEngine, beneficiaries,
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn add_beneficiary(&self, new: NewBeneficiary) -> ResultEngine<Beneficiary> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(EngineError::InvalidAmount(
                "beneficiary name must not be empty".to_string(),
            ));
        }
        let beneficiary = Beneficiary {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            name,
            phone: new.phone.trim().to_string(),
            email: new.email,
            account_number: new.account_number,
            bank_name: new.bank_name,
            relationship: new.relationship,
        };

        with_tx!(self, |db_tx| {
            beneficiaries::ActiveModel::from(&beneficiary)
                .insert(&db_tx)
                .await?;
            Ok(beneficiary)
        })
    }

    pub async fn list_beneficiaries(&self, user_id: Uuid) -> ResultEngine<Vec<Beneficiary>> {
        with_tx!(self, |db_tx| {
            let models = beneficiaries::Entity::find()
                .filter(beneficiaries::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(beneficiaries::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Beneficiary::try_from).collect()
        })
    }

    /// Delete a beneficiary; the owner filter doubles as the ownership check.
    pub async fn remove_beneficiary(
        &self,
        user_id: Uuid,
        beneficiary_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = beneficiaries::Entity::delete_many()
                .filter(beneficiaries::Column::Id.eq(beneficiary_id.to_string()))
                .filter(beneficiaries::Column::UserId.eq(user_id.to_string()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::BeneficiaryNotFound(
                    "beneficiary not exists".to_string(),
                ));
            }
            Ok(())
        })
    }
}
