//! Beneficiary manager
//!
//! Mỗi customer chỉ lưu một account number một lần. Pre-check cho lỗi rõ
//! ràng; constraint `UNIQUE(customer_id, account_number)` trong store chặn
//! trường hợp hai request đồng thời cùng vượt qua pre-check.

use ibank_core::{Beneficiary, NewBeneficiary};
use ibank_persistence::BeneficiaryRepo;
use tracing::{debug, info};

use crate::accounts::ensure_customer;
use crate::error::{BankError, BankResult};
use crate::services::ServiceContext;

/// Beneficiary Service - add, list, delete
pub struct BeneficiaryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BeneficiaryService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Thêm beneficiary cho customer, trả về id
    pub async fn add_beneficiary(
        &self,
        customer_id: i64,
        name: &str,
        account_number: &str,
        bank_name: &str,
        ifsc_code: Option<&str>,
    ) -> BankResult<i64> {
        let beneficiary = NewBeneficiary::new(name, account_number, bank_name, ifsc_code)?;
        ensure_customer(self.ctx, customer_id).await?;

        if BeneficiaryRepo::exists(self.ctx.pool(), customer_id, &beneficiary.account_number)
            .await?
        {
            debug!(customer_id, account_number = %beneficiary.account_number, "Duplicate beneficiary");
            return Err(BankError::DuplicateBeneficiary {
                account_number: beneficiary.account_number,
            });
        }

        let id = match BeneficiaryRepo::insert(self.ctx.pool(), customer_id, &beneficiary).await {
            Ok(id) => id,
            Err(err) if err.is_unique_violation() => {
                return Err(BankError::DuplicateBeneficiary {
                    account_number: beneficiary.account_number,
                });
            }
            Err(err) => return Err(err.into()),
        };

        info!(beneficiary_id = id, customer_id, "Beneficiary added");
        Ok(id)
    }

    /// Liệt kê beneficiaries của customer theo tên
    pub async fn list_beneficiaries(&self, customer_id: i64) -> BankResult<Vec<Beneficiary>> {
        let rows = BeneficiaryRepo::get_by_customer(self.ctx.pool(), customer_id).await?;
        Ok(rows.into_iter().map(Beneficiary::from).collect())
    }

    /// Xóa beneficiary; `NotFound` nếu không tồn tại hoặc không thuộc customer
    pub async fn delete_beneficiary(&self, customer_id: i64, beneficiary_id: i64) -> BankResult<()> {
        let deleted = BeneficiaryRepo::delete(self.ctx.pool(), beneficiary_id, customer_id).await?;
        if deleted == 0 {
            return Err(BankError::not_found("Beneficiary", beneficiary_id));
        }

        info!(beneficiary_id, customer_id, "Beneficiary deleted");
        Ok(())
    }
}
