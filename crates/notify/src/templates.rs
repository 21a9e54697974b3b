//! HTML bodies for account lifecycle email.

use crate::mailer::OutboundEmail;

/// Minimal HTML escaping for user-supplied text.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn email_verification(to: &str, otp: &str) -> OutboundEmail {
    OutboundEmail {
        to: to.to_string(),
        subject: "Email Verification".to_string(),
        html: format!(
            "<p>Your verification code</p>\
             <h1>{}</h1>\
             <p>The code expires in one hour.</p>",
            escape(otp)
        ),
    }
}

pub fn welcome(to: &str, name: &str) -> OutboundEmail {
    OutboundEmail {
        to: to.to_string(),
        subject: "Welcome Email".to_string(),
        html: format!(
            "<h1>Welcome to Reelview, {}!</h1>\
             <p>Your email is verified. Thanks for joining us.</p>",
            escape(name)
        ),
    }
}

pub fn password_reset_link(to: &str, link: &str) -> OutboundEmail {
    OutboundEmail {
        to: to.to_string(),
        subject: "Reset Password Link".to_string(),
        html: format!(
            "<p>Click here to reset your password</p>\
             <a href=\"{0}\">Change Password</a>\
             <p>The link expires in one hour.</p>",
            escape(link)
        ),
    }
}

pub fn password_changed(to: &str) -> OutboundEmail {
    OutboundEmail {
        to: to.to_string(),
        subject: "Password Reset Successfully".to_string(),
        html: "<h1>Password Reset Successfully</h1>\
               <p>Now you can use your new password.</p>"
            .to_string(),
    }
}
