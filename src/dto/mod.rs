//! DTOs that bridge services with list screens, dashboards and reports.

pub mod records;
