pub mod donation_flow_api;
