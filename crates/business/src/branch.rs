//! Branches (reference data)

use ibank_core::{Branch, CoreError};
use ibank_persistence::BranchRepo;
use tracing::info;

use crate::error::{BankError, BankResult};
use crate::services::ServiceContext;

/// Branch Service - create, list
pub struct BranchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BranchService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Tạo branch mới
    pub async fn create_branch(
        &self,
        name: &str,
        address: &str,
        contact_number: &str,
    ) -> BankResult<Branch> {
        let name = name.trim();
        let address = address.trim();
        let contact_number = contact_number.trim();
        for (field, value) in [("name", name), ("address", address), ("contact_number", contact_number)] {
            if value.is_empty() {
                return Err(CoreError::validation(field, "must not be empty").into());
            }
        }

        let id = BranchRepo::insert(self.ctx.pool(), name, address, contact_number).await?;
        info!(branch_id = id, name, "Branch created");
        self.get_branch(id).await
    }

    pub async fn list_branches(&self) -> BankResult<Vec<Branch>> {
        let rows = BranchRepo::get_all(self.ctx.pool()).await?;
        Ok(rows.into_iter().map(Branch::from).collect())
    }

    pub async fn get_branch(&self, branch_id: i64) -> BankResult<Branch> {
        match BranchRepo::get_by_id(self.ctx.pool(), branch_id).await {
            Ok(row) => Ok(row.into()),
            Err(err) if err.is_not_found() => Err(BankError::not_found("Branch", branch_id)),
            Err(err) => Err(err.into()),
        }
    }
}
