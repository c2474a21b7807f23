use paygate::queue::jobs::{
    max_worker_retries, worker_retry_delay_ms, PAYMENT_QUEUE, REFUND_QUEUE, WEBHOOK_QUEUE,
};

#[test]
fn processing_queues_retry_three_times() {
    assert_eq!(max_worker_retries(PAYMENT_QUEUE), 3);
    assert_eq!(max_worker_retries(REFUND_QUEUE), 3);
}

#[test]
fn webhook_queue_never_retries_at_queue_level() {
    assert_eq!(max_worker_retries(WEBHOOK_QUEUE), 0);
}

#[test]
fn retry_delays_double_from_one_second() {
    assert_eq!(worker_retry_delay_ms(1), 1_000);
    assert_eq!(worker_retry_delay_ms(2), 2_000);
    assert_eq!(worker_retry_delay_ms(3), 4_000);
}

#[test]
fn retry_delay_is_clamped_for_out_of_range_input() {
    assert_eq!(worker_retry_delay_ms(0), 1_000);
    assert_eq!(worker_retry_delay_ms(-3), 1_000);
}
