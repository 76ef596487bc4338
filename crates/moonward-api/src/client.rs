// Hand-crafted async HTTP client for the Moon parental-controls API.
//
// Base path: /moon/v1/
// Auth: bearer token from a caller-supplied TokenProvider

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::Error;
use crate::auth::AuthHandle;
use crate::endpoint::{BASE_URL, Endpoint, identity};
use crate::types;

// ── Problem body shape from the service ──────────────────────────────

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

// ── Raw dispatcher result ────────────────────────────────────────────

/// The classified result of one dispatched call.
///
/// `json` is the decoded body, degraded to an empty object when a 2xx
/// response carries no JSON (204-style bodies, wrong content type) so
/// callers reading optional fields never fail on an empty ack.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub json: Value,
    pub text: String,
    pub headers: reqwest::header::HeaderMap,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async dispatcher for the Moon API.
///
/// Resolves operations against the [`Endpoint`] catalog, injects the
/// client identity headers the service requires, refreshes the access
/// token before any call that would otherwise go out stale, and
/// normalizes non-2xx responses into [`Error::Http`]. No other layer
/// touches raw status codes.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthHandle,
    timezone: String,
    language: String,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client against the production service.
    pub fn new(
        auth: AuthHandle,
        timezone: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, Error> {
        Self::with_base_url(BASE_URL, auth, timezone, language)
    }

    /// Build a client against an alternate base URL (mock servers).
    pub fn with_base_url(
        base_url: &str,
        auth: AuthHandle,
        timezone: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, Error> {
        // Validate up front so later path joins cannot fail.
        Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert("X-Moon-App-Id", HeaderValue::from_static(identity::APP_ID));
        headers.insert("X-Moon-Os", HeaderValue::from_static(identity::OS_NAME));
        headers.insert(
            "X-Moon-Os-Version",
            HeaderValue::from_static(identity::OS_VERSION),
        );
        headers.insert(
            "X-Moon-Model",
            HeaderValue::from_static(identity::DEVICE_MODEL),
        );
        headers.insert(
            "X-Moon-App-Display-Version",
            HeaderValue::from_static(identity::APP_VERSION),
        );
        headers.insert(
            "X-Moon-App-Internal-Version",
            HeaderValue::from_static(identity::APP_BUILD),
        );

        let http = reqwest::Client::builder()
            .user_agent(identity::USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth,
            timezone: timezone.into(),
            language: language.into(),
        })
    }

    /// The account id the underlying token is scoped to.
    pub fn account_id(&self) -> String {
        self.auth.account_id().to_owned()
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Dispatch one operation and classify the response.
    ///
    /// Ordering guarantee: if the token source reports itself expired,
    /// the refresh completes before the request is built, so a stale
    /// token never reaches the wire.
    pub async fn send_request<B: Serialize + Sync>(
        &self,
        endpoint: Endpoint<'_>,
        body: Option<&B>,
    ) -> Result<ApiResponse, Error> {
        if self.auth.is_expired() {
            debug!("access token expired, refreshing before call");
            self.auth.refresh().await?;
        }

        let url = self.url(&endpoint)?;
        let operation = endpoint.name();
        debug!(operation, %url, "dispatching request");

        let token = self.auth.access_token();
        let mut request = self
            .http
            .request(endpoint.method(), url)
            .bearer_auth(token.expose_secret())
            .header("X-Moon-TimeZone", &self.timezone)
            .header("X-Moon-Os-Language", &self.language)
            .header("X-Moon-App-Language", &self.language);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::classify(operation, response).await
    }

    fn url(&self, endpoint: &Endpoint<'_>) -> Result<Url, Error> {
        Ok(Url::parse(&format!(
            "{}{}",
            self.base_url,
            endpoint.path()
        ))?)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn classify(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<ApiResponse, Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        if status.is_success() {
            let json = serde_json::from_str(&text).unwrap_or_else(|e| {
                debug!(operation, error = %e, "non-JSON success body, degrading to empty object");
                Value::Object(Map::new())
            });
            return Ok(ApiResponse {
                status: status.as_u16(),
                json,
                text,
                headers,
            });
        }

        // Structured problem body when present, raw text otherwise.
        let (message, error_code) = match serde_json::from_str::<ProblemBody>(&text) {
            Ok(problem) => (
                problem.detail.unwrap_or_else(|| {
                    if text.is_empty() {
                        status.to_string()
                    } else {
                        text.clone()
                    }
                }),
                problem.error_code,
            ),
            Err(_) => (
                if text.is_empty() {
                    status.to_string()
                } else {
                    text.clone()
                },
                None,
            ),
        };

        Err(Error::Http {
            status: status.as_u16(),
            message,
            error_code,
        })
    }

    /// The single typed-decode boundary per payload shape.
    fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: ApiResponse,
    ) -> Result<T, Error> {
        serde_json::from_value(response.json).map_err(|e| Error::Payload {
            endpoint: operation,
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<T, Error> {
        let operation = endpoint.name();
        let response = self.send_request::<()>(endpoint, None).await?;
        Self::decode(operation, response)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        endpoint: Endpoint<'_>,
        body: &B,
    ) -> Result<T, Error> {
        let operation = endpoint.name();
        let response = self.send_request(endpoint, Some(body)).await?;
        Self::decode(operation, response)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Account ──────────────────────────────────────────────────────

    pub async fn get_account_devices(&self) -> Result<types::OwnedDevicesResponse, Error> {
        let account_id = self.account_id();
        self.get(Endpoint::AccountDevices {
            account_id: &account_id,
        })
        .await
    }

    pub async fn get_account_device(&self, device_id: &str) -> Result<types::OwnedDevice, Error> {
        let account_id = self.account_id();
        self.get(Endpoint::AccountDevice {
            account_id: &account_id,
            device_id,
        })
        .await
    }

    // ── Summaries ────────────────────────────────────────────────────

    pub async fn get_device_daily_summaries(
        &self,
        device_id: &str,
    ) -> Result<types::DailySummariesResponse, Error> {
        self.get(Endpoint::DailySummaries { device_id }).await
    }

    pub async fn get_device_monthly_summaries(
        &self,
        device_id: &str,
    ) -> Result<types::MonthlySummariesResponse, Error> {
        self.get(Endpoint::MonthlySummaries { device_id }).await
    }

    pub async fn get_device_monthly_summary(
        &self,
        device_id: &str,
        year: i32,
        month: u32,
    ) -> Result<types::MonthlySummary, Error> {
        self.get(Endpoint::MonthlySummary {
            device_id,
            year,
            month,
        })
        .await
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub async fn get_parental_control_setting(
        &self,
        device_id: &str,
    ) -> Result<types::ParentalControlSetting, Error> {
        self.get(Endpoint::ParentalControlSetting { device_id })
            .await
    }

    /// Replace the play-timer regulations. The acknowledgment embeds the
    /// updated settings document.
    pub async fn update_play_timer(
        &self,
        device_id: &str,
        regulations: &types::PlayTimerRegulations,
    ) -> Result<types::ParentalControlSetting, Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            device_id: &'a str,
            play_timer_regulations: &'a types::PlayTimerRegulations,
        }

        self.post(
            Endpoint::UpdatePlayTimer { device_id },
            &Body {
                device_id,
                play_timer_regulations: regulations,
            },
        )
        .await
    }

    /// Replace the unlock code (PIN).
    pub async fn update_unlock_code(
        &self,
        device_id: &str,
        unlock_code: &str,
    ) -> Result<types::ParentalControlSetting, Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            device_id: &'a str,
            unlock_code: &'a str,
        }

        self.post(
            Endpoint::UpdateUnlockCode { device_id },
            &Body {
                device_id,
                unlock_code,
            },
        )
        .await
    }

    /// Replace restriction level, whitelist and/or custom settings.
    pub async fn update_restriction_level(
        &self,
        update: &types::RestrictionUpdate,
    ) -> Result<types::ParentalControlSetting, Error> {
        self.post(
            Endpoint::UpdateRestrictionLevel {
                device_id: &update.device_id,
            },
            update,
        )
        .await
    }

    /// Grant extra playing time for today. `-1` lifts the limit for the
    /// rest of the day (`TO_INFINITY`); positive minutes are added on
    /// top of the configured cap (`TO_ADDED`). The ack carries no
    /// settings document -- callers re-fetch authoritative state.
    pub async fn update_extra_playing_time(
        &self,
        device_id: &str,
        minutes: i32,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            device_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            additional_time: Option<i32>,
            status: &'static str,
        }

        let body = if minutes == -1 {
            Body {
                device_id,
                additional_time: None,
                status: "TO_INFINITY",
            }
        } else {
            Body {
                device_id,
                additional_time: Some(minutes),
                status: "TO_ADDED",
            }
        };

        self.send_request(Endpoint::UpdateExtraPlayingTime { device_id }, Some(&body))
            .await?;
        Ok(())
    }

    // ── Alarm state ──────────────────────────────────────────────────

    pub async fn get_alarm_setting_state(
        &self,
        device_id: &str,
    ) -> Result<types::AlarmStateResponse, Error> {
        self.get(Endpoint::AlarmSettingState { device_id }).await
    }

    /// Change alarm visibility. `status` is `TO_VISIBLE` or
    /// `TO_INVISIBLE`.
    pub async fn update_alarm_setting_state(
        &self,
        device_id: &str,
        status: &str,
    ) -> Result<types::AlarmStateResponse, Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'a> {
            device_id: &'a str,
            status: &'a str,
        }

        self.post(
            Endpoint::UpdateAlarmSettingState { device_id },
            &Body { device_id, status },
        )
        .await
    }
}
