//! School-wide pricing and opening hours.

use serde::{Deserialize, Serialize};

use crate::common::TimeOfDay;
use crate::reservation::CourseCategory;

/// Price per licence category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CoursePrices {
    #[serde(rename = "A", default)]
    pub a: f64,
    #[serde(rename = "B", default)]
    pub b: f64,
    #[serde(rename = "C", default)]
    pub c: f64,
    #[serde(rename = "D", default)]
    pub d: f64,
}

impl Default for CoursePrices {
    fn default() -> Self {
        Self {
            a: 2800.0,
            b: 3200.0,
            c: 4500.0,
            d: 6000.0,
        }
    }
}

impl CoursePrices {
    pub fn price_for(&self, category: CourseCategory) -> f64 {
        match category {
            CourseCategory::A => self.a,
            CourseCategory::B => self.b,
            CourseCategory::C => self.c,
            CourseCategory::D => self.d,
        }
    }

    pub fn set(&mut self, category: CourseCategory, price: f64) {
        let slot = match category {
            CourseCategory::A => &mut self.a,
            CourseCategory::B => &mut self.b,
            CourseCategory::C => &mut self.c,
            CourseCategory::D => &mut self.d,
        };
        *slot = price;
    }
}

/// Advisory opening hours; schedule entries are not checked against them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatingHours {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Default for OperatingHours {
    fn default() -> Self {
        Self {
            start: TimeOfDay::new(8, 0).unwrap_or_default(),
            end: TimeOfDay::new(18, 0).unwrap_or_default(),
        }
    }
}

impl OperatingHours {
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time <= self.end
    }
}
