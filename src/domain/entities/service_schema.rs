//! # Service Schema
//!
//! Per-service parametrization of the single quote engine.
//!
//! A [`ServiceSchema`] lists the priceable areas of one service type, the
//! pricing strategies each area accepts, and the compiled-in fallback
//! [`RateCard`]. Every service type runs through the same evaluators; only
//! its schema differs.
//!
//! [`SchemaRegistry`] maps service keys to schemas and is shared read-only
//! between quote sessions and the configuration resolver.

use crate::domain::entities::effective_config::RateCard;
use crate::domain::value_objects::{AreaKey, PricingType, ServiceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One priceable area of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDefinition {
    key: AreaKey,
    label: String,
    strategies: Vec<PricingType>,
    default_pricing_type: PricingType,
    enabled_by_default: bool,
}

impl AreaDefinition {
    /// Creates an area accepting the given strategies.
    ///
    /// The first listed strategy becomes the default; an empty list means
    /// preset only. Custom pricing is always accepted.
    #[must_use]
    pub fn new(key: &str, label: impl Into<String>, strategies: &[PricingType]) -> Self {
        let mut strategies: Vec<PricingType> = if strategies.is_empty() {
            vec![PricingType::Preset]
        } else {
            strategies.to_vec()
        };
        if !strategies.contains(&PricingType::Custom) {
            strategies.push(PricingType::Custom);
        }
        let default_pricing_type = strategies.first().copied().unwrap_or_default();

        Self {
            key: AreaKey::new(key),
            label: label.into(),
            strategies,
            default_pricing_type,
            enabled_by_default: false,
        }
    }

    /// Marks the area as enabled when a form is created.
    #[must_use]
    pub fn enabled_by_default(mut self) -> Self {
        self.enabled_by_default = true;
        self
    }

    /// Returns the area key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &AreaKey {
        &self.key
    }

    /// Returns the display label.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the accepted strategies.
    #[inline]
    #[must_use]
    pub fn strategies(&self) -> &[PricingType] {
        &self.strategies
    }

    /// Returns the strategy selected on creation.
    #[inline]
    #[must_use]
    pub const fn default_pricing_type(&self) -> PricingType {
        self.default_pricing_type
    }

    /// Returns whether the area starts enabled.
    #[inline]
    #[must_use]
    pub const fn is_enabled_by_default(&self) -> bool {
        self.enabled_by_default
    }

    /// Returns true if the area accepts `pricing_type`.
    #[must_use]
    pub fn supports(&self, pricing_type: PricingType) -> bool {
        self.strategies.contains(&pricing_type)
    }
}

/// Schema of one service type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSchema {
    service_id: ServiceId,
    display_name: String,
    areas: Vec<AreaDefinition>,
    fallback: RateCard,
}

impl ServiceSchema {
    /// Creates a schema with no areas.
    #[must_use]
    pub fn new(service_id: ServiceId, display_name: impl Into<String>, fallback: RateCard) -> Self {
        Self {
            service_id,
            display_name: display_name.into(),
            areas: Vec::new(),
            fallback,
        }
    }

    /// Schema used for service keys without a registered schema: no areas,
    /// all rates zero, static billing table.
    #[must_use]
    pub fn empty(service_id: ServiceId) -> Self {
        let display_name = service_id.to_string();
        Self::new(service_id, display_name, RateCard::default())
    }

    /// Appends an area definition.
    #[must_use]
    pub fn with_area(mut self, area: AreaDefinition) -> Self {
        self.areas.push(area);
        self
    }

    /// Returns the service key.
    #[inline]
    #[must_use]
    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the areas in display order.
    #[inline]
    #[must_use]
    pub fn areas(&self) -> &[AreaDefinition] {
        &self.areas
    }

    /// Looks up an area definition.
    #[must_use]
    pub fn area(&self, key: &AreaKey) -> Option<&AreaDefinition> {
        self.areas.iter().find(|a| a.key() == key)
    }

    /// Returns the compiled-in fallback rate card.
    #[inline]
    #[must_use]
    pub const fn fallback(&self) -> &RateCard {
        &self.fallback
    }

    /// Returns true if the fallback charges a trip on labour visits.
    #[must_use]
    pub fn models_trip_charge(&self) -> bool {
        !self.fallback.core.trip_charge.is_zero()
    }
}

/// Read-only registry of service schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<ServiceId, Arc<ServiceSchema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in service.
    #[must_use]
    pub fn builtin() -> Self {
        super::catalog::all()
            .into_iter()
            .fold(Self::new(), Self::with_schema)
    }

    /// Registers a schema, replacing any with the same key.
    #[must_use]
    pub fn with_schema(mut self, schema: ServiceSchema) -> Self {
        self.schemas
            .insert(schema.service_id().clone(), Arc::new(schema));
        self
    }

    /// Returns the schema for a service key.
    #[must_use]
    pub fn get(&self, service_id: &ServiceId) -> Option<Arc<ServiceSchema>> {
        self.schemas.get(service_id).cloned()
    }

    /// Returns the schema for a service key, or an empty schema when unknown.
    #[must_use]
    pub fn get_or_empty(&self, service_id: &ServiceId) -> Arc<ServiceSchema> {
        self.get(service_id)
            .unwrap_or_else(|| Arc::new(ServiceSchema::empty(service_id.clone())))
    }

    /// Returns the registered service keys, sorted.
    #[must_use]
    pub fn service_ids(&self) -> Vec<ServiceId> {
        let mut ids: Vec<ServiceId> = self.schemas.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns the number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no schema is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
