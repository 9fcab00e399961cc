pub mod annotation {
    pub mod domain {
        pub mod frame_annotator;
    }
    pub mod infrastructure {
        pub mod outline_annotator;
    }
}

pub mod detection {
    pub mod domain {
        pub mod block_differencer;
        pub mod motion_detector;
        pub mod motion_processor;
        pub mod region_merger;
    }
}

pub mod pipeline {
    pub mod detect_motion_use_case;
    pub mod frame_stages;
    pub mod infrastructure;
    pub mod pipeline_executor;
    pub mod pipeline_logger;
}

pub mod report {
    pub mod domain {
        pub mod report_writer;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod block_grid;
    pub mod constants;
    pub mod error;
    pub mod frame;
    pub mod motion_config;
    pub mod region;
    pub mod source_metadata;
}

pub mod video {
    pub mod domain {
        pub mod frame_source;
        pub mod image_writer;
    }
    pub mod infrastructure;
}
