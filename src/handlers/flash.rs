//! One-shot success notices carried across the post/redirect/get cycle in a
//! `flash` cookie.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{COOKIE, LOCATION, SET_COOKIE},
        request::Parts,
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use std::{convert::Infallible, str::FromStr};
use strum::{AsRefStr, EnumString};

pub const FLASH_COOKIE: &str = "flash";

/// Notices a successful intake can leave for the next page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Notice {
    CategoryAdded,
    ItemAdded,
    StockInwardAdded,
    StockOutwardAdded,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::CategoryAdded => "Category added!",
            Notice::ItemAdded => "Item added!",
            Notice::StockInwardAdded => "Stock Inward entry added!",
            Notice::StockOutwardAdded => "Stock Outward entry added!",
        }
    }
}

/// Flash state of the incoming request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flash {
    /// A `flash` cookie was sent, readable or not
    present: bool,
    notice: Option<Notice>,
}

impl Flash {
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Whether the response must clear the cookie
    pub fn is_pending(&self) -> bool {
        self.present
    }

    fn from_cookie_headers<'a>(values: impl Iterator<Item = &'a HeaderValue>) -> Self {
        let value = values
            .filter_map(|v| v.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .map(|(_, value)| value.trim().to_string());

        match value {
            Some(value) => Self {
                present: true,
                notice: Notice::from_str(&value).ok(),
            },
            None => Self::default(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_cookie_headers(parts.headers.get_all(COOKIE).iter()))
    }
}

fn cookie_header(value: &str, max_age: Option<u32>) -> HeaderValue {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", FLASH_COOKIE, value);
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age));
    }
    // cookie names and notice keys are plain ASCII
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// `Set-Cookie` value that expires the flash cookie
pub fn clear_cookie() -> HeaderValue {
    cookie_header("", Some(0))
}

/// 303 back to `path`, leaving `notice` for the next GET.
pub fn redirect_with_notice(path: &'static str, notice: Notice) -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (LOCATION, HeaderValue::from_static(path)),
            (SET_COOKIE, cookie_header(notice.as_ref(), None)),
        ],
    )
        .into_response()
}
