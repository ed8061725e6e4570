//! Geofence containment
use crate::data_model::Coordinates;
use std::collections::HashMap;

/// Answers whether a point lies inside a named geofence
pub trait GeofenceLookup: Send + Sync {
    fn contains(&self, geofence: &str, point: &Coordinates) -> bool;
}

/// A closed polygon given by its vertices
#[derive(Debug, Clone)]
pub struct Geofence {
    vertices: Vec<Coordinates>,
}

impl Geofence {
    pub fn new(vertices: Vec<Coordinates>) -> Self {
        Self { vertices }
    }

    /// Build from `[lat, lng]` pairs as written in configuration
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Self {
        Self::new(pairs.iter().map(|p| Coordinates::new(p[0], p[1])).collect())
    }

    /// Even-odd ray casting
    pub fn contains(&self, point: &Coordinates) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = self.vertices.len() - 1;
        for i in 0..self.vertices.len() {
            let a = &self.vertices[i];
            let b = &self.vertices[j];
            if (a.longitude > point.longitude) != (b.longitude > point.longitude) {
                let crossing = (b.latitude - a.latitude) * (point.longitude - a.longitude)
                    / (b.longitude - a.longitude)
                    + a.latitude;
                if point.latitude < crossing {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Named geofences held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticGeofences {
    fences: HashMap<String, Geofence>,
}

impl StaticGeofences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &HashMap<String, Vec<[f64; 2]>>) -> Self {
        let fences = config
            .iter()
            .map(|(name, pairs)| (name.clone(), Geofence::from_pairs(pairs)))
            .collect();
        Self { fences }
    }

    pub fn with_fence(mut self, name: impl Into<String>, fence: Geofence) -> Self {
        self.fences.insert(name.into(), fence);
        self
    }
}

impl GeofenceLookup for StaticGeofences {
    fn contains(&self, geofence: &str, point: &Coordinates) -> bool {
        match self.fences.get(geofence) {
            Some(fence) => fence.contains(point),
            None => {
                tracing::warn!(geofence, "unknown geofence; treating point as outside");
                false
            }
        }
    }
}
