// @file: cmc_client/src/tests/mod.rs
// @description: Test suites exercising request building, classification and shape normalization.
// @author: LAS.


mod response_classifier;
