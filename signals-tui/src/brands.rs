//! Brand records and where they come from.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use log::{debug, info};
use serde::Deserialize;
use signals_lib::error::{Error, FieldValidationError, ValidationError};
use signals_ui::table::{CellValue, Record};

/// A monitored brand.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Brand {
    pub id: u32,
    pub name: String,
    pub industry: String,
    #[serde(default)]
    pub mentions: u32,
    /// Average sentiment in `-1.0..=1.0`, absent until enough mentions exist.
    #[serde(default)]
    pub sentiment: Option<f64>,
}

impl Record for Brand {
    fn field(&self, name: &str) -> CellValue {
        match name {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "industry" => self.industry.as_str().into(),
            "mentions" => self.mentions.into(),
            "sentiment" => self.sentiment.into(),
            _ => CellValue::Null,
        }
    }
}

/// Parse and validate a JSON array of brands.
///
/// Malformed input is a validation error and is never retried.
pub fn parse_brands(json: &str) -> Result<Vec<Brand>, Error> {
    let brands: Vec<Brand> =
        serde_json::from_str(json).map_err(|e| ValidationError::field("data", e.to_string()))?;

    let mut invalid = ValidationError::default();
    for (i, brand) in brands.iter().enumerate() {
        if brand.name.trim().is_empty() {
            invalid.push(FieldValidationError::new(format!("[{}].name", i), "is required"));
        }
        if let Some(sentiment) = brand.sentiment
            && !(-1.0..=1.0).contains(&sentiment)
        {
            invalid.push(FieldValidationError::with_code(
                format!("[{}].sentiment", i),
                "must be between -1 and 1",
                "range",
            ));
        }
    }
    invalid.into_result()?;
    Ok(brands)
}

/// Built-in brand list used when no data file exists.
pub fn sample() -> Vec<Brand> {
    let brand = |id, name: &str, industry: &str, mentions, sentiment| Brand {
        id,
        name: name.to_string(),
        industry: industry.to_string(),
        mentions,
        sentiment,
    };
    vec![
        brand(1, "Northwind", "Retail", 18_240, Some(0.42)),
        brand(2, "acme", "Manufacturing", 9_310, Some(-0.12)),
        brand(3, "Contoso", "Software", 27_905, Some(0.18)),
        brand(4, "Fabrikam", "Manufacturing", 4_120, None),
        brand(5, "Tailspin", "Travel", 12_776, Some(-0.37)),
        brand(6, "Wingtip", "Retail", 640, None),
        brand(7, "Litware", "Software", 8_052, Some(0.71)),
        brand(8, "Proseware", "Healthcare", 15_498, Some(0.05)),
    ]
}

/// Loads brands from a file or the built-in sample.
///
/// `fail_first` makes the first N loads fail with a transient error, which
/// exercises the retry path without a real outage.
#[derive(Debug)]
pub struct BrandSource {
    path: Option<PathBuf>,
    fail_first: u32,
    calls: AtomicU32,
}

impl BrandSource {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            fail_first: 0,
            calls: AtomicU32::new(0),
        }
    }

    pub fn fail_first(mut self, n: u32) -> Self {
        self.fail_first = n;
        self
    }

    /// Loads attempted so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Load the brand list once.
    pub async fn fetch(&self) -> Result<Vec<Brand>, Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.fail_first {
            debug!("simulated outage on load {}", call);
            return Err(Error::transient("brand service unavailable"));
        }

        let Some(path) = &self.path else {
            info!("using built-in sample brands");
            return Ok(sample());
        };

        let json = tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => Error::from(
                ValidationError::field("data", format!("{}: {}", path.display(), e)),
            ),
            _ => Error::transient(format!("reading {}: {}", path.display(), e)),
        })?;
        let brands = parse_brands(&json)?;
        info!("loaded {} brands from {}", brands.len(), path.display());
        Ok(brands)
    }
}
