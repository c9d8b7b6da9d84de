// Licensed under the Apache-2.0 license

mod test_fifo_mailbox;
mod test_vse_mailbox;

#[cfg(test)]
mod test {
    use std::sync::Once;

    static LOGGER: Once = Once::new();

    pub fn init_logger() {
        LOGGER.call_once(|| {
            let _ = simple_logger::SimpleLogger::new()
                .with_level(log::LevelFilter::Debug)
                .init();
        });
    }
}
