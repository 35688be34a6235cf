//! Sign-in and sign-out.

use super::{LOCKED_OUT_USER, PASSWORD, STANDARD_USER};
use crate::pages::{HomePage, LoginPage};
use crate::result::SuiteResult;
use crate::session::Session;
use crate::{verify, verify_eq};

pub(super) async fn successful_login(session: &Session) -> SuiteResult<()> {
    let login = LoginPage::open(session).await?;
    verify!(login.is_loaded().await, "Login page not loaded");

    login.login(STANDARD_USER, PASSWORD).await?;

    let home = HomePage::attach(session);
    verify!(home.is_loaded().await, "Home page not loaded after login");
    verify_eq!(home.heading().await?, "Products", "Incorrect page title");
    Ok(())
}

async fn expect_rejection(
    session: &Session,
    username: &str,
    password: &str,
    expected: &str,
) -> SuiteResult<()> {
    let login = LoginPage::open(session).await?;
    login.login(username, password).await?;

    verify!(login.is_error_displayed().await, "Error message not displayed");
    let message = login.error_message().await?;
    verify!(
        message.to_lowercase().contains(&expected.to_lowercase()),
        "Unexpected error message: {message}"
    );
    Ok(())
}

pub(super) async fn login_with_invalid_username(session: &Session) -> SuiteResult<()> {
    expect_rejection(
        session,
        "invalid_user",
        PASSWORD,
        "Username and password do not match",
    )
    .await
}

pub(super) async fn login_with_invalid_password(session: &Session) -> SuiteResult<()> {
    expect_rejection(
        session,
        STANDARD_USER,
        "wrong_password",
        "Username and password do not match",
    )
    .await
}

pub(super) async fn login_with_empty_credentials(session: &Session) -> SuiteResult<()> {
    let login = LoginPage::open(session).await?;
    login.click_login().await?;

    verify!(login.is_error_displayed().await, "Error message not displayed");
    let message = login.error_message().await?;
    verify!(
        message.contains("Username is required"),
        "Unexpected error message: {message}"
    );
    Ok(())
}

pub(super) async fn login_with_locked_user(session: &Session) -> SuiteResult<()> {
    expect_rejection(session, LOCKED_OUT_USER, PASSWORD, "locked out").await
}

pub(super) async fn logout(session: &Session) -> SuiteResult<()> {
    let login = LoginPage::open(session).await?;
    login.login(STANDARD_USER, PASSWORD).await?;

    let home = HomePage::attach(session);
    verify!(home.is_loaded().await, "Home page not loaded after login");
    home.logout().await?;

    verify!(
        LoginPage::attach(session).is_loaded().await,
        "Not redirected to login page after logout"
    );
    Ok(())
}

pub(super) async fn dismiss_login_error(session: &Session) -> SuiteResult<()> {
    let login = LoginPage::open(session).await?;
    login.click_login().await?;
    verify!(login.is_error_displayed().await, "Error message not displayed");

    login.dismiss_error().await?;
    verify!(
        !login.is_error_displayed().await,
        "Error message still shown after dismissing it"
    );
    Ok(())
}
