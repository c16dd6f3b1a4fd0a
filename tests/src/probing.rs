mod integration;
mod loopback;
