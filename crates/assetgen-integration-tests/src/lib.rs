//! End-to-end tests for the AssetGen server live under `tests/`
