/* src/config/tests/mod.rs */
