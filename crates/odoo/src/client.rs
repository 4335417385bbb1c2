//! Odoo XML-RPC client.
//!
//! Two endpoints: `common` for authentication, `object` for `execute_kw`
//! model calls. All requests carry a timeout, and transient transport
//! failures get one retry with backoff before surfacing as "unreachable".

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use pulso_core::fiscal::Period;

use crate::error::OdooError;
use crate::types::{
    BillingType, HoursGroup, OdooDepartment, normalize_departments, normalize_hours_groups,
};
use crate::xmlrpc::{self, Value, XmlRpcError};

/// Odoo model holding departments.
const DEPARTMENT_MODEL: &str = "hr.department";
/// Odoo model holding timesheet/analytic lines.
const ANALYTIC_LINE_MODEL: &str = "account.analytic.line";
/// Billing classification field on analytic lines.
const BILLING_FIELD: &str = "timesheet_invoice_type";

/// Delay before the single transport retry.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// An authenticated session context.
///
/// Odoo has no session tokens for XML-RPC; every `object` call re-sends
/// database, uid, and password.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Odoo database name.
    pub database: String,
    /// Numeric user id from `authenticate`.
    pub uid: i64,
    /// Decrypted password, held only in process memory.
    pub password: String,
}

/// XML-RPC client for one Odoo server.
#[derive(Debug, Clone)]
pub struct OdooClient {
    http: reqwest::Client,
    base_url: String,
}

impl OdooClient {
    /// Creates a client for the given server root URL.
    ///
    /// # Errors
    ///
    /// Returns `OdooError::Configuration` when the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OdooError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OdooError::Configuration(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Authenticates against the `common` endpoint, returning the uid.
    ///
    /// # Errors
    ///
    /// `OdooError::InvalidCredentials` when the server answers with a
    /// falsy uid; transport and URL problems per [`OdooError`].
    pub async fn authenticate(
        &self,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<i64, OdooError> {
        let value = self
            .call(
                "common",
                "authenticate",
                &[
                    Value::string(database),
                    Value::string(username),
                    Value::string(password),
                    Value::Struct(BTreeMap::new()),
                ],
            )
            .await?;

        match value {
            Value::Int(uid) if uid > 0 => Ok(uid),
            Value::Int(_) | Value::Bool(false) => Err(OdooError::InvalidCredentials),
            other => Err(OdooError::UnexpectedResponse(format!(
                "authenticate returned {other:?}"
            ))),
        }
    }

    /// Generic `execute_kw` model call on the `object` endpoint.
    pub async fn execute_kw(
        &self,
        auth: &AuthContext,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: BTreeMap<String, Value>,
    ) -> Result<Value, OdooError> {
        debug!(model, method, "odoo execute_kw");
        self.call(
            "object",
            "execute_kw",
            &[
                Value::string(&auth.database),
                Value::Int(auth.uid),
                Value::string(&auth.password),
                Value::string(model),
                Value::string(method),
                Value::Array(args),
                Value::Struct(kwargs),
            ],
        )
        .await
    }

    /// Fetches all departments (id, name) for diagnostics.
    pub async fn fetch_departments(
        &self,
        auth: &AuthContext,
    ) -> Result<Vec<OdooDepartment>, OdooError> {
        let mut kwargs = BTreeMap::new();
        kwargs.insert(
            "fields".to_string(),
            Value::Array(vec![Value::string("id"), Value::string("name")]),
        );

        let value = self
            .execute_kw(
                auth,
                DEPARTMENT_MODEL,
                "search_read",
                vec![Value::Array(vec![])],
                kwargs,
            )
            .await?;
        normalize_departments(&value)
    }

    /// Fetches billable hours aggregated by department for one month.
    ///
    /// Runs `read_group` over analytic lines bounded to the month's date
    /// range, summing `unit_amount`, optionally filtered by billing type.
    pub async fn fetch_hours_by_department(
        &self,
        auth: &AuthContext,
        period: Period,
        billing_types: &[BillingType],
    ) -> Result<Vec<HoursGroup>, OdooError> {
        let mut domain = vec![
            Value::Array(vec![
                Value::string("date"),
                Value::string(">="),
                Value::string(period.first_day().to_string()),
            ]),
            Value::Array(vec![
                Value::string("date"),
                Value::string("<="),
                Value::string(period.last_day().to_string()),
            ]),
        ];
        domain.extend(billing_filter(billing_types));

        let args = vec![
            Value::Array(domain),
            Value::Array(vec![
                Value::string("unit_amount"),
                Value::string("department_id"),
            ]),
            Value::Array(vec![Value::string("department_id")]),
        ];

        let value = self
            .execute_kw(auth, ANALYTIC_LINE_MODEL, "read_group", args, BTreeMap::new())
            .await?;
        normalize_hours_groups(&value)
    }

    /// One XML-RPC call with HTML detection and a bounded retry.
    async fn call(
        &self,
        endpoint: &str,
        method: &str,
        params: &[Value],
    ) -> Result<Value, OdooError> {
        let url = format!("{}/xmlrpc/2/{endpoint}", self.base_url);
        let body = xmlrpc::encode_call(method, params);

        let mut last_transport: Option<String> = None;
        for attempt in 0..2u8 {
            if attempt > 0 {
                warn!(method, "retrying odoo call after transport error");
                tokio::time::sleep(RETRY_BACKOFF).await;
            }

            let response = match self
                .http
                .post(&url)
                .header(CONTENT_TYPE, "text/xml")
                .body(body.clone())
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_transport = Some(e.to_string());
                    continue;
                }
                Err(e) => return Err(OdooError::Transport(e.to_string())),
            };

            let text = response
                .text()
                .await
                .map_err(|e| OdooError::Transport(e.to_string()))?;

            let head = text.trim_start().to_ascii_lowercase();
            if head.starts_with("<!doctype") || head.starts_with("<html") {
                return Err(OdooError::WrongUrl);
            }

            return xmlrpc::parse_response(&text).map_err(|e| match e {
                XmlRpcError::Fault { code, message } => OdooError::Fault { code, message },
                other => OdooError::UnexpectedResponse(other.to_string()),
            });
        }

        Err(OdooError::Unreachable(
            last_transport.unwrap_or_else(|| "no attempt made".to_string()),
        ))
    }
}

/// Builds the billing-type domain clauses.
///
/// One type is an equality, two are an explicit OR, three or more use an
/// `in` filter. No types means no clause.
fn billing_filter(billing_types: &[BillingType]) -> Vec<Value> {
    let clause = |t: BillingType| {
        Value::Array(vec![
            Value::string(BILLING_FIELD),
            Value::string("="),
            Value::string(t.odoo_value()),
        ])
    };

    match billing_types {
        [] => vec![],
        [only] => vec![clause(*only)],
        [first, second] => vec![Value::string("|"), clause(*first), clause(*second)],
        many => vec![Value::Array(vec![
            Value::string(BILLING_FIELD),
            Value::string("in"),
            Value::Array(
                many.iter()
                    .map(|t| Value::string(t.odoo_value()))
                    .collect(),
            ),
        ])],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq_clause(value: &str) -> Value {
        Value::Array(vec![
            Value::string(BILLING_FIELD),
            Value::string("="),
            Value::string(value),
        ])
    }

    #[test]
    fn test_no_billing_types_no_clause() {
        assert!(billing_filter(&[]).is_empty());
    }

    #[test]
    fn test_one_billing_type_is_equality() {
        let domain = billing_filter(&[BillingType::Timesheet]);
        assert_eq!(domain, vec![eq_clause("billable_time")]);
    }

    #[test]
    fn test_two_billing_types_are_an_or() {
        let domain = billing_filter(&[BillingType::Timesheet, BillingType::FixedPrice]);
        assert_eq!(
            domain,
            vec![
                Value::string("|"),
                eq_clause("billable_time"),
                eq_clause("billable_fixed"),
            ]
        );
    }

    #[test]
    fn test_three_billing_types_use_in() {
        let domain = billing_filter(&[
            BillingType::Timesheet,
            BillingType::FixedPrice,
            BillingType::Milestone,
        ]);
        assert_eq!(
            domain,
            vec![Value::Array(vec![
                Value::string(BILLING_FIELD),
                Value::string("in"),
                Value::Array(vec![
                    Value::string("billable_time"),
                    Value::string("billable_fixed"),
                    Value::string("billable_milestones"),
                ]),
            ])]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OdooClient::new("https://erp.example.com/", Duration::from_secs(30)).unwrap();
        assert_eq!(client.base_url, "https://erp.example.com");
    }
}
