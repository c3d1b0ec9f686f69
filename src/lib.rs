pub mod action {
    pub mod cli;
    pub mod interactive;
}

pub mod config {
    pub mod config;
    pub mod ports;
}

pub mod facade {
    pub mod conversion_facade;
    pub mod task;
    pub mod traits {
        pub mod i_conversion;
    }
}

pub mod models {
    pub mod batch;
    pub mod conversion;
    pub mod file;
    pub mod history;
}

pub mod service {
    pub mod config_service;
    pub mod file;
    pub mod history;
    pub mod icon;
    pub mod traits {
        pub mod i_service;
    }
}

pub mod utils {
    pub mod convert;
    pub mod utils;
}
