//! Spreadsheet client binding.
//!
//! [`SheetsApi`] is the capability the task store is generic over: read a
//! rectangular range, append a row, overwrite a row, delete rows
//! structurally. [`SheetsClient`] implements it against the Sheets v4 REST
//! endpoints with a bearer access token; tests substitute an in-memory
//! implementation.

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Row and range operations the task store needs from a spreadsheet backend.
pub trait SheetsApi {
    /// Read a rectangular cell grid. May be empty; ragged rows stay ragged.
    fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>>;

    /// Append one row after the last data row of the range.
    fn append_row(&self, range: &str, row: &[String]) -> Result<()>;

    /// Overwrite exactly the cells of `range` with one row.
    fn update_row(&self, range: &str, row: &[String]) -> Result<()>;

    /// Structurally delete rows `[start_index, end_index)` (0-based) from
    /// the sheet with the given numeric id.
    fn delete_rows(&self, sheet_id: i64, start_index: u32, end_index: u32) -> Result<()>;
}

/// Full-range reference for a sheet, e.g. `タスク!A:K`.
pub fn sheet_range(sheet: &str, span: &str) -> String {
    format!("{sheet}!{span}")
}

/// Single-row reference across a span, e.g. `タスク!A5:K5` for row 5 of `A:K`.
pub fn row_range(sheet: &str, span: &str, row: u32) -> String {
    match span.split_once(':') {
        Some((start, end)) => format!("{sheet}!{start}{row}:{end}{row}"),
        None => format!("{sheet}!{span}{row}"),
    }
}

/// Blocking HTTP implementation of [`SheetsApi`].
pub struct SheetsClient {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsClient {
    pub fn new(base_url: &str, spreadsheet_id: &str, access_token: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// URL of a values endpoint; the range goes into the path and must be
    /// percent-encoded (sheet names are routinely non-ASCII).
    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/{}/values/{}{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range),
            suffix,
        )
    }

    fn batch_update_url(&self) -> String {
        format!("{}/{}:batchUpdate", self.base_url, self.spreadsheet_id)
    }
}

impl SheetsApi for SheetsClient {
    fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        debug!(range, "sheets: read");
        let resp = self
            .http
            .get(self.values_url(range, ""))
            .bearer_auth(&self.access_token)
            .send()?;
        let resp = check_response(resp)?;
        let body: ValueRangeResponse = resp.json()?;
        Ok(body.values)
    }

    fn append_row(&self, range: &str, row: &[String]) -> Result<()> {
        debug!(range, "sheets: append row");
        let body = ValueRangeBody {
            values: vec![row.to_vec()],
        };
        let resp = self
            .http
            .post(self.values_url(range, ":append"))
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()?;
        check_response(resp)?;
        Ok(())
    }

    fn update_row(&self, range: &str, row: &[String]) -> Result<()> {
        debug!(range, "sheets: update row");
        let body = ValueRangeBody {
            values: vec![row.to_vec()],
        };
        let resp = self
            .http
            .put(self.values_url(range, ""))
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()?;
        check_response(resp)?;
        Ok(())
    }

    fn delete_rows(&self, sheet_id: i64, start_index: u32, end_index: u32) -> Result<()> {
        debug!(sheet_id, start_index, end_index, "sheets: delete rows");
        let body = BatchUpdateBody {
            requests: vec![BatchRequest {
                delete_dimension: DeleteDimensionRequest {
                    range: DimensionRange {
                        sheet_id,
                        dimension: "ROWS",
                        start_index,
                        end_index,
                    },
                },
            }],
        };
        let resp = self
            .http
            .post(self.batch_update_url())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()?;
        check_response(resp)?;
        Ok(())
    }
}

/// Map a non-2xx response to an error, pulling the message out of the API's
/// error body when it parses. 401/403 mean the token is the problem.
fn check_response(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().unwrap_or_default();
    let message = match parse_api_error(&body) {
        Some(message) => message,
        None => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        }
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Unauthorized(message));
    }
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

fn parse_api_error(body: &str) -> Option<String> {
    let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Read response of the values endpoint; `values` is absent for an empty range.
#[derive(Debug, Deserialize)]
struct ValueRangeResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct BatchUpdateBody {
    requests: Vec<BatchRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest {
    delete_dimension: DeleteDimensionRequest,
}

#[derive(Debug, Serialize)]
struct DeleteDimensionRequest {
    range: DimensionRange,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DimensionRange {
    sheet_id: i64,
    dimension: &'static str,
    start_index: u32,
    end_index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_helpers_build_a1_references() {
        assert_eq!(sheet_range("タスク", "A:K"), "タスク!A:K");
        assert_eq!(row_range("タスク", "A:K", 5), "タスク!A5:K5");
        assert_eq!(row_range("カテゴリマスタ", "A", 3), "カテゴリマスタ!A3");
    }

    #[test]
    fn values_url_percent_encodes_the_range() {
        let client = SheetsClient::new("https://sheets.example.test/v4/spreadsheets/", "sid", "tok");
        let url = client.values_url("タスク!A2:K2", ":append");
        assert!(url.starts_with("https://sheets.example.test/v4/spreadsheets/sid/values/"));
        assert!(url.ends_with(":append"));
        // No raw delimiter characters left in the path segment.
        let segment = url
            .rsplit('/')
            .next()
            .expect("segment");
        assert!(!segment.contains('!'));
        assert!(segment.contains("%21"));
    }

    #[test]
    fn empty_read_response_deserializes_to_no_rows() {
        let body: ValueRangeResponse =
            serde_json::from_str(r#"{"range":"タスク!A:K","majorDimension":"ROWS"}"#)
                .expect("parse");
        assert!(body.values.is_empty());
    }

    #[test]
    fn delete_body_matches_the_batch_update_shape() {
        let body = BatchUpdateBody {
            requests: vec![BatchRequest {
                delete_dimension: DeleteDimensionRequest {
                    range: DimensionRange {
                        sheet_id: 0,
                        dimension: "ROWS",
                        start_index: 2,
                        end_index: 3,
                    },
                },
            }],
        };

        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "requests": [{
                    "deleteDimension": {
                        "range": {
                            "sheetId": 0,
                            "dimension": "ROWS",
                            "startIndex": 2,
                            "endIndex": 3,
                        }
                    }
                }]
            })
        );
    }

    #[test]
    fn api_error_message_is_extracted() {
        let body = r#"{"error":{"code":400,"message":"Unable to parse range","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            parse_api_error(body).as_deref(),
            Some("Unable to parse range")
        );
        assert!(parse_api_error("not json").is_none());
    }
}
