use super::Client;
use crate::args::{ArgsBuilder, LoginParams};
use crate::exec::RawOutcome;
use crate::models::{Version, WhoAmI};
use crate::outcome::{into_text, ExecError, SoftPolicy};

impl Client {
    /// Log in to Atlas Cloud.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` for an empty token, without
    /// starting the tool.
    pub async fn login(&self, params: &LoginParams) -> Result<(), ExecError> {
        self.invoke(params.build_args()?).await.map(drop)
    }

    /// Log out of Atlas Cloud.
    ///
    /// # Errors
    ///
    /// Returns the error of the run.
    pub async fn logout(&self) -> Result<(), ExecError> {
        self.invoke(vec!["logout".into()]).await.map(drop)
    }

    /// The organization the tool is logged in to.
    ///
    /// # Errors
    ///
    /// Returns the error of the run, e.g. when logged out.
    pub async fn whoami(&self) -> Result<WhoAmI, ExecError> {
        let args = ArgsBuilder::new(&["whoami"]).json().build();
        self.invoke_one(args, SoftPolicy::Decode).await
    }

    /// The version of the tool.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::MalformedOutput` if the output is not a version
    /// line.
    pub async fn version(&self) -> Result<Version, ExecError> {
        let raw = self.run(vec!["version".into()]).await?;
        let exit = raw.exit();
        let text = into_text(raw)?;
        Version::parse(&text).ok_or_else(|| {
            ExecError::malformed(&RawOutcome::new(exit, &text, ""), None)
        })
    }
}
