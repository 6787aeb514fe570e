use super::Client;
use crate::args::{
    SchemaApplyParams, SchemaInspectParams, SchemaPlanApproveParams, SchemaPlanLintParams,
    SchemaPlanListParams, SchemaPlanParams, SchemaPlanPullParams, SchemaPlanPushParams,
    SchemaPlanValidateParams, SchemaTestParams,
};
use crate::models::{SchemaApply, SchemaPlan, SchemaPlanApprove, SchemaPlanFile};
use crate::outcome::{expect_one, ExecError, SoftPolicy};

impl Client {
    /// Run `schema apply` against a single target.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::PartialFailure` when a change failed to apply.
    pub async fn schema_apply(&self, params: &SchemaApplyParams) -> Result<SchemaApply, ExecError> {
        expect_one(self.schema_apply_slice(params).await?)
    }

    /// Run `schema apply`, one result per target.
    ///
    /// # Errors
    ///
    /// Same as [`Client::schema_apply`], without the cardinality check.
    pub async fn schema_apply_slice(
        &self,
        params: &SchemaApplyParams,
    ) -> Result<Vec<SchemaApply>, ExecError> {
        self.invoke_many(params.build_args(), SoftPolicy::Decode)
            .await
    }

    /// Run `schema inspect` and return the schema in the requested format.
    ///
    /// # Errors
    ///
    /// Returns the error of the run.
    pub async fn schema_inspect(&self, params: &SchemaInspectParams) -> Result<String, ExecError> {
        self.invoke(params.build_args()).await
    }

    /// Run `schema test` and return its report.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Tool` when a test failed.
    pub async fn schema_test(&self, params: &SchemaTestParams) -> Result<String, ExecError> {
        self.invoke(params.build_args()).await
    }

    /// Run `schema plan`.
    ///
    /// # Errors
    ///
    /// Returns the error of the run.
    pub async fn schema_plan(&self, params: &SchemaPlanParams) -> Result<SchemaPlan, ExecError> {
        self.invoke_one(params.build_args()?, SoftPolicy::Decode)
            .await
    }

    /// Run `schema plan list`. The tool prints all plans as one JSON array.
    ///
    /// # Errors
    ///
    /// Returns the error of the run.
    pub async fn schema_plan_list(
        &self,
        params: &SchemaPlanListParams,
    ) -> Result<Vec<SchemaPlanFile>, ExecError> {
        self.invoke_one(params.build_args()?, SoftPolicy::Decode)
            .await
    }

    /// Run `schema plan push` and return the pushed plan URL.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without a plan file.
    pub async fn schema_plan_push(&self, params: &SchemaPlanPushParams) -> Result<String, ExecError> {
        self.invoke(params.build_args()?).await
    }

    /// Run `schema plan pull` and return the plan file contents.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without a plan URL.
    pub async fn schema_plan_pull(&self, params: &SchemaPlanPullParams) -> Result<String, ExecError> {
        self.invoke(params.build_args()?).await
    }

    /// Run `schema plan lint`.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without a plan file.
    pub async fn schema_plan_lint(&self, params: &SchemaPlanLintParams) -> Result<SchemaPlan, ExecError> {
        self.invoke_one(params.build_args()?, SoftPolicy::Decode)
            .await
    }

    /// Run `schema plan validate`.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without a plan file, and
    /// `ExecError::Tool` when the plan is invalid.
    pub async fn schema_plan_validate(&self, params: &SchemaPlanValidateParams) -> Result<(), ExecError> {
        self.invoke(params.build_args()?).await.map(drop)
    }

    /// Run `schema plan approve`.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without a plan URL.
    pub async fn schema_plan_approve(
        &self,
        params: &SchemaPlanApproveParams,
    ) -> Result<SchemaPlanApprove, ExecError> {
        self.invoke_one(params.build_args()?, SoftPolicy::Decode)
            .await
    }
}
