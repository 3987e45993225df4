//! Email adapters implementing the invitation mailer port.
//!
//! Two adapters exist: a drop-directory mailer that writes each message as a
//! text file (local development and end-to-end inspection), and a log-only
//! mailer for deployments without an email collaborator configured. Delivery
//! failures are reported to the caller but never roll back issuance.

mod drop_directory;
mod log_only;

pub use drop_directory::DropDirectoryMailer;
pub use log_only::LogOnlyMailer;

/// Render the plain-text invitation body shared by all mailer adapters.
fn invitation_body(survey_title: &str, response_link: &str) -> String {
    format!(
        "Hello,\n\n\
        You have been invited to take the survey \"{survey_title}\".\n\n\
        Your responses are completely anonymous, and this link can only be used once.\n\n\
        Start the survey: {response_link}\n\n\
        If you were not expecting this email, you can safely ignore it.\n\n\
        Thank you!\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_the_title_and_link() {
        let body = invitation_body("Lunch Poll", "https://surveys.test/respond/abc");

        assert!(body.contains("\"Lunch Poll\""));
        assert!(body.contains("https://surveys.test/respond/abc"));
        assert!(body.contains("only be used once"));
    }
}
