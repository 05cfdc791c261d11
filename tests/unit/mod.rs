mod full_pipeline_test;
mod occ_roundtrip_test;
