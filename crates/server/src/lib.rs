pub mod config;

pub mod db;

pub mod error_convert;

pub mod telemetry;

pub mod health;

pub mod auth;

pub mod openapi;

pub mod rest;

// Barangay case management domain
pub mod repo;

pub mod workflow;

pub mod mailgun;

pub mod delivery;
