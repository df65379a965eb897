//! SMTP delivery through lettre

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{SmtpTransport, Transport};
use std::net::IpAddr;
use std::time::Duration;

use super::{Mailer, NotifyError, RateNotice};
use crate::config::Configuration;
use crate::constants::SMTPS_PORT;

/// Sends notices with PLAIN authentication, the sender address doubling as
/// the username.
#[derive(Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    endpoint: String,
    username: String,
    password: String,
    timeout: Option<Duration>,
    resolved: Option<IpAddr>,
}

/// TLS mode for a server.
///
/// Port 465 speaks TLS from the first byte. Elsewhere credentials only go
/// out after STARTTLS, except on a loopback host where a cleartext session
/// is accepted if the server offers no upgrade.
pub fn tls_for(host: &str, port: u16, params: TlsParameters) -> Tls {
    if port == SMTPS_PORT {
        Tls::Wrapper(params)
    } else if is_loopback(host) {
        Tls::Opportunistic(params)
    } else {
        Tls::Required(params)
    }
}

/// `localhost` or a loopback IP literal. Names are not resolved.
pub fn is_loopback(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

impl SmtpMailer {
    pub fn from_config(config: &Configuration, timeout: Option<Duration>) -> Self {
        SmtpMailer {
            host: config.smtp_addr.clone(),
            port: config.smtp_port,
            endpoint: config.smtp_endpoint(),
            username: config.from.clone(),
            password: config.smtp_auth.clone(),
            timeout,
            resolved: None,
        }
    }

    /// Connect to `addr` instead of resolving the host name. The host name
    /// still decides the TLS mode and is the name the certificate must match.
    pub fn resolve_to(mut self, addr: IpAddr) -> Self {
        self.resolved = Some(addr);
        self
    }

    fn transport_error(&self, reason: impl ToString) -> NotifyError {
        NotifyError::Transport {
            endpoint: self.endpoint.clone(),
            reason: reason.to_string(),
        }
    }

    fn transport(&self) -> Result<SmtpTransport, NotifyError> {
        let params = TlsParameters::new(self.host.clone()).map_err(|e| self.transport_error(e))?;
        let server = match self.resolved {
            Some(addr) => addr.to_string(),
            None => self.host.clone(),
        };

        Ok(SmtpTransport::builder_dangerous(server)
            .port(self.port)
            .tls(tls_for(&self.host, self.port, params))
            .credentials(Credentials::new(self.username.clone(), self.password.clone()))
            .authentication(vec![Mechanism::Plain])
            .timeout(self.timeout)
            .build())
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, notice: &RateNotice) -> Result<(), NotifyError> {
        let message = build_message(notice)?;
        let transport = self.transport()?;

        log::info!(
            "Sending rate notice to {} recipient(s) via {}",
            notice.recipients.len(),
            self.endpoint
        );
        let response = transport
            .send(&message)
            .map_err(|e| self.transport_error(e))?;
        log::debug!("SMTP server answered {}", response.code());
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Build the MIME message for a notice. All recipients share one `To` header.
pub fn build_message(notice: &RateNotice) -> Result<Message, NotifyError> {
    if notice.recipients.is_empty() {
        return Err(NotifyError::Message("no recipients configured".to_string()));
    }

    let mut builder = Message::builder()
        .from(parse_mailbox(&notice.from)?)
        .subject(notice.subject.as_str())
        .header(ContentType::TEXT_PLAIN);
    for recipient in &notice.recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    builder
        .body(notice.body.clone())
        .map_err(|e| NotifyError::Message(e.to_string()))
}
