//! Login screen.

use crate::base_page::BasePage;
use crate::locator::Locator;
use crate::result::SuiteResult;
use crate::session::Session;

/// The storefront's sign-in form
#[derive(Debug, Clone, Copy)]
pub struct LoginPage<'s> {
    page: BasePage<'s>,
}

impl<'s> LoginPage<'s> {
    /// Username field
    pub const USERNAME_INPUT: Locator = Locator::id("user-name");
    /// Password field
    pub const PASSWORD_INPUT: Locator = Locator::id("password");
    /// Submit button
    pub const LOGIN_BUTTON: Locator = Locator::id("login-button");
    /// Error banner
    pub const ERROR_MESSAGE: Locator = Locator::css("h3[data-test='error']");
    /// Error banner close button
    pub const ERROR_BUTTON: Locator = Locator::class_name("error-button");

    /// Navigate to the base URL and return the page
    pub async fn open(session: &'s Session) -> SuiteResult<Self> {
        let page = Self::attach(session);
        page.page.navigate(&session.config().base_url).await?;
        Ok(page)
    }

    /// Bind to the current screen without navigating
    #[must_use]
    pub fn attach(session: &'s Session) -> Self {
        Self {
            page: BasePage::new(session),
        }
    }

    /// Type the username
    pub async fn enter_username(&self, username: &str) -> SuiteResult<()> {
        self.page.enter_text(&Self::USERNAME_INPUT, username).await
    }

    /// Type the password
    pub async fn enter_password(&self, password: &str) -> SuiteResult<()> {
        self.page.enter_text(&Self::PASSWORD_INPUT, password).await
    }

    /// Submit the form
    pub async fn click_login(&self) -> SuiteResult<()> {
        self.page.click(&Self::LOGIN_BUTTON).await
    }

    /// Fill both fields and submit
    pub async fn login(&self, username: &str, password: &str) -> SuiteResult<()> {
        tracing::info!(username, "Logging in");
        self.enter_username(username).await?;
        self.enter_password(password).await?;
        self.click_login().await
    }

    /// Error banner visible within the absence timeout
    pub async fn is_error_displayed(&self) -> bool {
        let timeout = self.page.session().config().absence_timeout();
        self.page.is_displayed(&Self::ERROR_MESSAGE, timeout).await
    }

    /// Error banner text
    pub async fn error_message(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::ERROR_MESSAGE).await
    }

    /// Close the error banner
    pub async fn dismiss_error(&self) -> SuiteResult<()> {
        self.page.click(&Self::ERROR_BUTTON).await
    }

    /// Login button visible
    pub async fn is_loaded(&self) -> bool {
        self.page
            .is_displayed(&Self::LOGIN_BUTTON, self.page.policy().timeout)
            .await
    }

    /// Base page primitives
    #[must_use]
    pub const fn base(&self) -> &BasePage<'s> {
        &self.page
    }
}
