mod test_concurrency;
mod test_limits;
