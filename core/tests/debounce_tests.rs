// tests/debounce_tests.rs
mod common;

use common::*;
use serial_test::serial;
use solecart::LinePhase;
use std::time::Duration;

#[tokio::test(start_paused = true)]
#[serial]
async fn test_two_taps_coalesce_into_one_request_with_last_value() {
  setup_tracing();
  let h = harness(vec![cart_line(1, 2, Some(5))]);

  h.reconciler.request_quantity_change(L1, 3).unwrap();
  advance(100).await;
  h.reconciler.request_quantity_change(L1, 4).unwrap();

  // Visible at once, nothing sent yet.
  assert_eq!(h.store.quantity_of(L1), Some(4));
  assert_eq!(h.store.phase_of(L1), Some(LinePhase::PendingDebounce));
  assert!(h.service.update_calls().is_empty());

  advance(799).await;
  assert!(h.service.update_calls().is_empty(), "quiet period not over yet");

  advance(2).await;
  let calls = h.service.update_calls();
  assert_eq!(calls.len(), 1);
  assert_eq!(calls[0].line_id, L1);
  assert_eq!(calls[0].update.quantity, 4);
  assert_eq!(calls[0].update.product_id, cart_line(1, 2, None).product_id);
  let sent_after = calls[0].at.duration_since(h.started);
  assert!(
    sent_after >= Duration::from_millis(900) && sent_after < Duration::from_millis(905),
    "sent after {:?}",
    sent_after
  );

  assert_eq!(h.store.confirmed_quantity_of(L1), Some(4));
  assert_eq!(h.store.quantity_of(L1), Some(4));
  assert!(!h.store.is_updating(L1));
  assert_eq!(h.store.phase_of(L1), Some(LinePhase::Idle));
  assert!(h.toasts.messages().is_empty());
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_long_burst_sends_only_final_value() {
  setup_tracing();
  let h = harness(vec![cart_line(1, 1, Some(20))]);

  for quantity in 2..=9 {
    h.reconciler.request_quantity_change(L1, quantity).unwrap();
    advance(300).await;
  }
  assert!(h.service.update_calls().is_empty());
  assert_eq!(h.reconciler.pending_count(), 1);

  advance(600).await;
  assert_eq!(h.service.updated_quantities(L1), vec![9]);
  assert_eq!(h.reconciler.pending_count(), 0);
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_separate_bursts_send_one_request_each() {
  setup_tracing();
  let h = harness(vec![cart_line(1, 1, Some(20))]);

  h.reconciler.request_quantity_change(L1, 2).unwrap();
  h.reconciler.request_quantity_change(L1, 3).unwrap();
  advance(1000).await;
  h.reconciler.request_quantity_change(L1, 5).unwrap();
  advance(100).await;
  h.reconciler.request_quantity_change(L1, 6).unwrap();
  advance(1000).await;

  assert_eq!(h.service.updated_quantities(L1), vec![3, 6]);
  assert_eq!(h.store.confirmed_quantity_of(L1), Some(6));
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_lines_are_debounced_independently() {
  setup_tracing();
  let h = harness(vec![cart_line(1, 1, Some(10)), cart_line(2, 1, Some(10))]);
  h.service.script([Scripted::ok_after(500), Scripted::ok_after(500)]);

  h.reconciler.request_quantity_change(L1, 2).unwrap();
  advance(200).await;
  h.reconciler.request_quantity_change(L2, 3).unwrap();

  // L1 fires at 800 and is still in flight when L2 fires at 1000.
  advance(850).await;
  assert_eq!(h.service.update_calls().len(), 2);
  assert!(h.store.is_updating(L1));
  assert!(h.store.is_updating(L2));
  assert_eq!(h.store.phase_of(L2), Some(LinePhase::Persisting));

  advance(600).await;
  assert!(!h.store.is_updating(L1));
  assert!(!h.store.is_updating(L2));
  assert_eq!(h.service.updated_quantities(L1), vec![2]);
  assert_eq!(h.service.updated_quantities(L2), vec![3]);
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_updating_mark_spans_the_request() {
  setup_tracing();
  let h = harness(vec![cart_line(1, 2, Some(5))]);
  h.service.script([Scripted::ok_after(400)]);

  h.reconciler.request_quantity_change(L1, 3).unwrap();
  assert!(!h.store.is_updating(L1));

  advance(801).await;
  let view = h.store.view(L1).unwrap();
  assert!(view.updating);
  assert_eq!(view.phase, LinePhase::Persisting);
  assert_eq!(view.line.quantity, 3);
  assert_eq!(view.confirmed_quantity, 2);

  advance(400).await;
  let view = h.store.view(L1).unwrap();
  assert!(!view.updating);
  assert_eq!(view.confirmed_quantity, 3);
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_requesting_confirmed_value_keeps_visible_state() {
  setup_tracing();
  let h = harness(vec![cart_line(1, 2, Some(5))]);

  h.reconciler.request_quantity_change(L1, 2).unwrap();
  assert_eq!(h.store.quantity_of(L1), Some(2));

  advance(1000).await;
  // A redundant request is allowed; the observable value does not move.
  assert_eq!(h.service.updated_quantities(L1), vec![2]);
  assert_eq!(h.store.quantity_of(L1), Some(2));
  assert_eq!(h.store.confirmed_quantity_of(L1), Some(2));
}

#[tokio::test(start_paused = true)]
#[serial]
async fn test_change_during_flight_schedules_a_second_request() {
  setup_tracing();
  let h = harness(vec![cart_line(1, 2, Some(9))]);
  h.service.script([Scripted::ok_after(600), Scripted::ok_after(0)]);

  h.reconciler.request_quantity_change(L1, 3).unwrap();
  advance(900).await; // first request in flight until 1400
  h.reconciler.request_quantity_change(L1, 7).unwrap();
  assert_eq!(h.store.phase_of(L1), Some(LinePhase::PendingDebounce));
  assert!(h.store.is_updating(L1));

  advance(600).await; // first settles at 1400
  assert_eq!(h.store.quantity_of(L1), Some(7), "older success must not overwrite the newer value");
  assert_eq!(h.store.confirmed_quantity_of(L1), Some(3));

  advance(300).await; // second fires at 1700
  assert_eq!(h.service.updated_quantities(L1), vec![3, 7]);
  assert_eq!(h.store.confirmed_quantity_of(L1), Some(7));
  assert_eq!(h.store.phase_of(L1), Some(LinePhase::Idle));
}
