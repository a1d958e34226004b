//! Unit tests for vx-pool.

use std::io::Cursor;

use vx_core::{NodeId, SimRng, SimTime, Vector3};
use vx_mobility::MobilityStore;

use crate::{
    EndpointState, FcdDriver, MobilityDriver, NodeLifecycle, NodePool, NullDriver, PoolError,
    SpeedControl,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HORIZON: SimTime = SimTime::from_secs(80);

/// `n` pool endpoints moving at 10 m/s, plus one extra node outside the pool.
fn setup(n: usize) -> (NodePool, MobilityStore, NodeId) {
    let mut mobility = MobilityStore::new();
    let nodes: Vec<NodeId> = (0..n)
        .map(|i| mobility.add_node(Vector3::new(10.0 * i as f64, 0.0, 0.0), Vector3::new(10.0, 0.0, 0.0)))
        .collect();
    let outsider = mobility.add_node(Vector3::ZERO, Vector3::ZERO);
    (NodePool::new(nodes, HORIZON, SimRng::new(7)), mobility, outsider)
}

fn is_parked(p: Vector3) -> bool {
    (-100.0..=-76.0).contains(&p.x) && (320.0..=344.0).contains(&p.y) && p.z == 250.0
}

#[cfg(test)]
mod behavior {
    use super::*;

    #[test]
    fn active_window_is_half_open() {
        let b = SpeedControl::new(NodeId(0), SimTime::from_secs(1), SimTime::from_secs(3));
        assert!(!b.is_active(SimTime::ZERO));
        assert!(b.is_active(SimTime::from_secs(1)));
        assert!(!b.is_active(SimTime::from_secs(3)));
    }

    #[test]
    fn stop_now_is_idempotent() {
        let mut b = SpeedControl::new(NodeId(0), SimTime::ZERO, HORIZON);
        assert!(b.stop_now(SimTime::from_secs(2)));
        assert!(!b.is_active(SimTime::from_secs(2)));
        assert!(!b.stop_now(SimTime::from_secs(5)));
    }
}

#[cfg(test)]
mod pool {
    use super::*;

    #[test]
    fn checkout_walks_the_ring_and_starts_behavior() {
        let (mut pool, _, _) = setup(2);
        let now = SimTime::from_secs(1);
        let a = pool.checkout(now).unwrap();
        assert_eq!(a, NodeId(0));
        assert_eq!(pool.state(a).unwrap(), EndpointState::Active);
        let b = pool.behavior(a).unwrap().copied().unwrap();
        assert_eq!((b.start, b.stop), (now, HORIZON));
        assert_eq!(pool.checkout(now).unwrap(), NodeId(1));
        assert_eq!(pool.live(), 2);
        assert_eq!(pool.cursor(), 0);
    }

    #[test]
    fn checkout_beyond_capacity_is_fatal() {
        let (mut pool, _, _) = setup(2);
        pool.checkout(SimTime::ZERO).unwrap();
        pool.checkout(SimTime::ZERO).unwrap();
        let err = pool.checkout(SimTime::ZERO).unwrap_err();
        assert!(matches!(err, PoolError::Exhausted { capacity: 2, live: 2 }));
    }

    #[test]
    fn empty_pool_is_exhausted() {
        let (mut pool, _, _) = setup(0);
        assert!(matches!(pool.checkout(SimTime::ZERO), Err(PoolError::Exhausted { capacity: 0, live: 0 })));
    }

    #[test]
    fn checkout_after_release_takes_next_ring_endpoint() {
        let (mut pool, mut mobility, _) = setup(3);
        let t = SimTime::from_secs(2);
        let a = pool.checkout(t).unwrap();
        pool.release(a, t, &mut mobility).unwrap();
        assert_eq!(pool.state(a).unwrap(), EndpointState::Parked);
        assert_eq!(pool.checkout(t).unwrap(), NodeId(1));
        assert_eq!(pool.checkout(t).unwrap(), NodeId(2));
        // Ring wraps back onto the released endpoint.
        assert_eq!(pool.checkout(t).unwrap(), a);
        assert_eq!(pool.state(a).unwrap(), EndpointState::Active);
        assert_eq!(pool.live(), 3);
    }

    #[test]
    fn release_parks_and_stops_motion() {
        let (mut pool, mut mobility, _) = setup(2);
        let a = pool.checkout(SimTime::ZERO).unwrap();
        let t = SimTime::from_secs(4);
        pool.release(a, t, &mut mobility).unwrap();
        assert!(!pool.is_controlled(a, t));
        let parked = mobility.position(a, t).unwrap();
        assert!(is_parked(parked), "{parked}");
        assert_eq!(mobility.position(a, SimTime::from_secs(60)).unwrap(), parked);
        assert_eq!(mobility.velocity(a).unwrap(), Vector3::ZERO);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn release_of_never_checked_out_endpoint_relocates() {
        let (mut pool, mut mobility, _) = setup(2);
        pool.release(NodeId(1), SimTime::ZERO, &mut mobility).unwrap();
        assert!(pool.behavior(NodeId(1)).unwrap().is_none());
        assert!(is_parked(mobility.position(NodeId(1), SimTime::ZERO).unwrap()));
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn release_outside_pool_is_fatal() {
        let (mut pool, mut mobility, outsider) = setup(2);
        let err = pool.release(outsider, SimTime::ZERO, &mut mobility).unwrap_err();
        assert!(matches!(err, PoolError::UnknownNode(n) if n == outsider));
    }

    #[test]
    fn checkout_skips_live_endpoint_under_cursor() {
        let (mut pool, mut mobility, _) = setup(2);
        let a = pool.checkout(SimTime::ZERO).unwrap();
        let b = pool.checkout(SimTime::ZERO).unwrap();
        pool.release(b, SimTime::from_secs(1), &mut mobility).unwrap();
        // Cursor sits on `a`, which is still live; `b` is handed out instead.
        let t = SimTime::from_secs(2);
        assert_eq!(pool.checkout(t).unwrap(), b);
        assert_eq!(pool.live(), 2);
        assert_eq!(pool.cursor(), 0);
        assert_eq!(pool.behavior(a).unwrap().unwrap().start, SimTime::ZERO);
        assert_eq!(pool.behavior(b).unwrap().unwrap().start, t);
        let err = pool.checkout(t).unwrap_err();
        assert!(matches!(err, PoolError::Exhausted { capacity: 2, live: 2 }));
    }

    #[test]
    fn parking_jitter_is_seed_deterministic() {
        let park = |seed| {
            let (_, mut mobility, _) = setup(1);
            let mut pool = NodePool::new(vec![NodeId(0)], HORIZON, SimRng::new(seed));
            pool.release(NodeId(0), SimTime::ZERO, &mut mobility).unwrap();
            mobility.position(NodeId(0), SimTime::ZERO).unwrap()
        };
        assert_eq!(park(3), park(3));
    }
}

#[cfg(test)]
mod fcd {
    use super::*;

    const TRACE: &str = "\
time_s,vehicle,x,y,z,vx,vy
0.0,veh0,0.0,0.0,0.0,10.0,0.0
0.0,veh1,30.0,0.0,0.0,10.0,0.0
1.0,veh0,10.0,0.0,0.0,12.0,0.0
1.0,veh1,40.0,0.0,0.0,10.0,0.0
2.0,veh0,22.0,0.0,0.0,12.0,0.0
";

    fn driver() -> FcdDriver {
        FcdDriver::from_reader(Cursor::new(TRACE)).unwrap()
    }

    #[test]
    fn loads_rows() {
        let d = driver();
        assert_eq!(d.pending_rows(), 5);
        assert_eq!(d.mapped(), 0);
    }

    #[test]
    fn new_vehicles_are_checked_out_and_placed() {
        let (mut pool, mut mobility, _) = setup(2);
        let mut d = driver();
        d.sync(SimTime::ZERO, &mut pool, &mut mobility).unwrap();
        assert_eq!(d.node_for("veh0"), Some(NodeId(0)));
        assert_eq!(d.node_for("veh1"), Some(NodeId(1)));
        assert_eq!(mobility.position(NodeId(1), SimTime::ZERO).unwrap(), Vector3::new(30.0, 0.0, 0.0));
        assert_eq!(pool.live(), 2);
    }

    #[test]
    fn updates_overwrite_position_and_velocity() {
        let (mut pool, mut mobility, _) = setup(2);
        let mut d = driver();
        d.sync(SimTime::ZERO, &mut pool, &mut mobility).unwrap();
        let t1 = SimTime::from_secs(1);
        d.sync(t1, &mut pool, &mut mobility).unwrap();
        assert_eq!(mobility.position(NodeId(0), t1).unwrap(), Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(mobility.velocity(NodeId(0)).unwrap(), Vector3::new(12.0, 0.0, 0.0));
    }

    #[test]
    fn absent_vehicle_is_released() {
        let (mut pool, mut mobility, _) = setup(2);
        let mut d = driver();
        for s in 0..=2 {
            d.sync(SimTime::from_secs(s), &mut pool, &mut mobility).unwrap();
        }
        assert_eq!(d.node_for("veh1"), None);
        assert_eq!(pool.state(NodeId(1)).unwrap(), EndpointState::Parked);
        assert!(is_parked(mobility.position(NodeId(1), SimTime::from_secs(2)).unwrap()));
        assert_eq!(pool.live(), 1);
    }

    #[test]
    fn exhausted_trace_releases_everyone() {
        let (mut pool, mut mobility, _) = setup(2);
        let mut d = driver();
        for s in 0..=3 {
            d.sync(SimTime::from_secs(s), &mut pool, &mut mobility).unwrap();
        }
        assert_eq!(d.mapped(), 0);
        assert_eq!(pool.live(), 0);
    }

    #[test]
    fn more_vehicles_than_endpoints_is_fatal() {
        let (mut pool, mut mobility, _) = setup(1);
        let mut d = driver();
        let err = d.sync(SimTime::ZERO, &mut pool, &mut mobility).unwrap_err();
        assert!(matches!(err, PoolError::Exhausted { capacity: 1, live: 1 }));
    }

    #[test]
    fn arrival_after_departure_never_shares_an_endpoint() {
        let trace = "\
time_s,vehicle,x,y,z,vx,vy
0.0,veh0,0.0,0.0,0.0,10.0,0.0
0.0,veh1,30.0,0.0,0.0,10.0,0.0
1.0,veh0,10.0,0.0,0.0,10.0,0.0
1.0,veh2,50.0,0.0,0.0,10.0,0.0
2.0,veh0,20.0,0.0,0.0,10.0,0.0
2.0,veh2,60.0,0.0,0.0,10.0,0.0
2.0,veh3,90.0,0.0,0.0,10.0,0.0
";
        let (mut pool, mut mobility, _) = setup(2);
        let mut d = FcdDriver::from_reader(Cursor::new(trace)).unwrap();
        d.sync(SimTime::ZERO, &mut pool, &mut mobility).unwrap();

        // veh1 leaves, veh2 takes its parked endpoint rather than veh0's.
        let t1 = SimTime::from_secs(1);
        d.sync(t1, &mut pool, &mut mobility).unwrap();
        assert_eq!(d.node_for("veh0"), Some(NodeId(0)));
        assert_eq!(d.node_for("veh2"), Some(NodeId(1)));
        assert_eq!(pool.live(), 2);
        assert_eq!(mobility.position(NodeId(1), t1).unwrap(), Vector3::new(50.0, 0.0, 0.0));

        // A third concurrent vehicle exceeds the pool.
        let err = d.sync(SimTime::from_secs(2), &mut pool, &mut mobility).unwrap_err();
        assert!(matches!(err, PoolError::Exhausted { capacity: 2, live: 2 }));
        assert!(d.mapped() <= pool.capacity());
    }

    #[test]
    fn malformed_rows_rejected() {
        let bad = "time_s,vehicle,x,y,z,vx,vy\nabc,veh0,0,0,0,0,0\n";
        assert!(matches!(FcdDriver::from_reader(Cursor::new(bad)), Err(PoolError::Parse(_))));
        let negative = "time_s,vehicle,x,y,z,vx,vy\n-1,veh0,0,0,0,0,0\n";
        assert!(matches!(FcdDriver::from_reader(Cursor::new(negative)), Err(PoolError::Parse(_))));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("trace.csv");
        std::fs::write(&path, TRACE).unwrap();
        assert_eq!(FcdDriver::from_path(&path).unwrap().pending_rows(), 5);
        assert!(matches!(FcdDriver::from_path(&dir.path().join("missing.csv")), Err(PoolError::Io(_))));
    }

    #[test]
    fn null_driver_changes_nothing() {
        let (mut pool, mut mobility, _) = setup(2);
        NullDriver.sync(SimTime::from_secs(1), &mut pool, &mut mobility).unwrap();
        assert_eq!(pool.live(), 0);
        assert_eq!(mobility.position(NodeId(0), SimTime::from_secs(1)).unwrap(), Vector3::new(10.0, 0.0, 0.0));
    }
}
