//! Engine configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first when present.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_NAMESPACE` - storage key prefix (default: amazon)
//! - `STOREFRONT_DATA_DIR` - directory for the file store; unset keeps state in memory
//! - `STOREFRONT_CATALOG` - path to a JSON catalog; unset uses the built-in demo catalog
//! - `STOREFRONT_TAX_RATE` - decimal tax rate between 0 and 1 (default: 0.18)
//! - `STOREFRONT_SHIPPING` - flat shipping charge, at most 1000000 (default: 0)
//! - `STOREFRONT_DEMO_CVV` - CVV accepted for the saved card (default: 999)
//! - `STOREFRONT_PAYMENT_DELAY_MS` - simulated payment processing time (default: 2000)
//! - `STOREFRONT_SHIPPED_AFTER_SECS` - Placed to Shipped (default: 180)
//! - `STOREFRONT_OUT_FOR_DELIVERY_AFTER_SECS` - to Out for delivery (default: 240)
//! - `STOREFRONT_DELIVERED_AFTER_SECS` - to Delivered (default: 300)
//! - `STOREFRONT_TICK_MS` - delivery ticker period, non-zero (default: 1000)
//! - `STOREFRONT_CART_POLICY` - `permissive` or `clamp` (default: permissive)

use crate::checkout::CheckoutSettings;
use crate::model::{Amount, CartPolicy};
use crate::order_actor::DeliverySchedule;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Upper bound on the flat shipping charge.
pub const MAX_SHIPPING: Amount = 1_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {key}={value:?}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Everything the engine needs to start.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub namespace: String,
    pub data_dir: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub checkout: CheckoutSettings,
    pub schedule: DeliverySchedule,
    pub tick_period: Duration,
    pub cart_policy: CartPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            namespace: "amazon".to_string(),
            data_dir: None,
            catalog_path: None,
            checkout: CheckoutSettings::default(),
            schedule: DeliverySchedule::default(),
            tick_period: Duration::from_millis(1000),
            cart_policy: CartPolicy::Permissive,
        }
    }
}

impl EngineConfig {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let tax_rate = parse_or(&get, "STOREFRONT_TAX_RATE", defaults.checkout.tax_rate)?;
        if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
            return Err(invalid("STOREFRONT_TAX_RATE", &tax_rate.to_string(), "must be between 0 and 1"));
        }

        let shipping: Amount = parse_or(&get, "STOREFRONT_SHIPPING", defaults.checkout.shipping)?;
        if shipping > MAX_SHIPPING {
            return Err(invalid(
                "STOREFRONT_SHIPPING",
                &shipping.to_string(),
                &format!("must not exceed {MAX_SHIPPING}"),
            ));
        }

        let tick_ms = parse_or(&get, "STOREFRONT_TICK_MS", millis(defaults.tick_period))?;
        if tick_ms == 0 {
            return Err(invalid("STOREFRONT_TICK_MS", "0", "must be greater than zero"));
        }

        let schedule = DeliverySchedule {
            shipped_after: secs_or(&get, "STOREFRONT_SHIPPED_AFTER_SECS", defaults.schedule.shipped_after)?,
            out_for_delivery_after: secs_or(
                &get,
                "STOREFRONT_OUT_FOR_DELIVERY_AFTER_SECS",
                defaults.schedule.out_for_delivery_after,
            )?,
            delivered_after: secs_or(&get, "STOREFRONT_DELIVERED_AFTER_SECS", defaults.schedule.delivered_after)?,
        };
        if !schedule.is_ordered() {
            return Err(invalid(
                "STOREFRONT_DELIVERED_AFTER_SECS",
                &schedule.delivered_after.num_seconds().to_string(),
                "delivery thresholds must not decrease",
            ));
        }

        let cart_policy = match get("STOREFRONT_CART_POLICY") {
            None => defaults.cart_policy,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "permissive" => CartPolicy::Permissive,
                "clamp" | "clamp_to_stock" => CartPolicy::ClampToStock,
                _ => {
                    return Err(invalid(
                        "STOREFRONT_CART_POLICY",
                        &value,
                        "expected `permissive` or `clamp`",
                    ))
                }
            },
        };

        Ok(Self {
            namespace: get("STOREFRONT_NAMESPACE").unwrap_or(defaults.namespace),
            data_dir: get("STOREFRONT_DATA_DIR").map(PathBuf::from),
            catalog_path: get("STOREFRONT_CATALOG").map(PathBuf::from),
            checkout: CheckoutSettings {
                tax_rate,
                shipping,
                demo_cvv: get("STOREFRONT_DEMO_CVV").unwrap_or(defaults.checkout.demo_cvv),
                processing_delay: Duration::from_millis(parse_or(
                    &get,
                    "STOREFRONT_PAYMENT_DELAY_MS",
                    millis(defaults.checkout.processing_delay),
                )?),
            },
            schedule,
            tick_period: Duration::from_millis(tick_ms),
            cart_policy,
        })
    }

    /// Storage key of the cart snapshot.
    pub fn cart_key(&self) -> String {
        format!("{}_cart", self.namespace)
    }

    /// Storage key of the order history snapshot.
    pub fn orders_key(&self) -> String {
        format!("{}_orders", self.namespace)
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| invalid(key, &value, &e.to_string())),
    }
}

fn secs_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: chrono::Duration,
) -> Result<chrono::Duration, ConfigError> {
    let secs: u32 = parse_or(get, key, u32::try_from(default.num_seconds()).unwrap_or(u32::MAX))?;
    Ok(chrono::Duration::seconds(i64::from(secs)))
}
