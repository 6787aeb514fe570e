use super::Client;
use crate::args::{
    MigrateApplyParams, MigrateDownParams, MigrateLintParams, MigratePushParams,
    MigrateStatusParams, MigrateTestParams,
};
use crate::models::{MigrateApply, MigrateDown, MigrateStatus, SummaryReport};
use crate::outcome::{expect_one, into_verdict, ExecError, SoftPolicy};

impl Client {
    /// Run `migrate apply` against a single target.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::PartialFailure` when a file failed to apply; the
    /// error keeps every result the tool reported.
    pub async fn migrate_apply(&self, params: &MigrateApplyParams) -> Result<MigrateApply, ExecError> {
        expect_one(self.migrate_apply_slice(params).await?)
    }

    /// Run `migrate apply`, one result per target of a multi-target env.
    ///
    /// # Errors
    ///
    /// Same as [`Client::migrate_apply`], without the cardinality check.
    pub async fn migrate_apply_slice(
        &self,
        params: &MigrateApplyParams,
    ) -> Result<Vec<MigrateApply>, ExecError> {
        self.invoke_many(params.build_args()?, SoftPolicy::Decode).await
    }

    /// Run `migrate down`.
    ///
    /// # Errors
    ///
    /// Returns the error of the run. A revert that failed on a statement is
    /// an `ExecError::PartialFailure`.
    pub async fn migrate_down(&self, params: &MigrateDownParams) -> Result<MigrateDown, ExecError> {
        self.invoke_one(params.build_args()?, SoftPolicy::Decode).await
    }

    /// Run `migrate status`.
    ///
    /// # Errors
    ///
    /// Returns the error of the run.
    pub async fn migrate_status(
        &self,
        params: &MigrateStatusParams,
    ) -> Result<MigrateStatus, ExecError> {
        self.invoke_one(params.build_args(), SoftPolicy::Decode).await
    }

    /// Run `migrate lint` and return its findings.
    ///
    /// Findings are not an error here. Use [`Client::migrate_lint_error`] to
    /// fail on them or to print the report in another format.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` when a custom format or web
    /// reporting is requested.
    pub async fn migrate_lint(&self, params: &MigrateLintParams) -> Result<SummaryReport, ExecError> {
        if params.web || params.format.as_deref().is_some_and(|f| !f.is_empty()) {
            return Err(ExecError::invalid_params(
                "migrate lint",
                "Writer or Web reporting are not supported with migrate_lint, use migrate_lint_error",
            ));
        }
        self.invoke_one(params.build_args(false)?, SoftPolicy::Decode)
            .await
    }

    /// Run `migrate lint --exit-code` and return the printed report.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::SoftFailure` carrying the report when findings
    /// were reported, and `ExecError::Tool` when the tool itself failed.
    pub async fn migrate_lint_error(&self, params: &MigrateLintParams) -> Result<String, ExecError> {
        into_verdict(self.run(params.build_args(true)?).await?)
    }

    /// Run `migrate push` and return the URL of the pushed directory.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without a directory name.
    pub async fn migrate_push(&self, params: &MigratePushParams) -> Result<String, ExecError> {
        self.invoke(params.build_args()?).await
    }

    /// Run `migrate test` and return its report.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Tool` when a test failed.
    pub async fn migrate_test(&self, params: &MigrateTestParams) -> Result<String, ExecError> {
        self.invoke(params.build_args()?).await
    }
}
