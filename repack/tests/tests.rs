#[cfg(test)]
mod tests {
    use anyhow::Result;
    use float_cmp::approx_eq;
    use itertools::Itertools;
    use rand::prelude::SmallRng;
    use rand::seq::IndexedRandom;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    use repack::entities::{Anchor, Assessment, ChildSlot, Motion, RectId, Scene, SortKey};
    use repack::geometry::{Coord, Point, Rect};
    use repack::outline::{Direction, NodeKey, Outline, Shape, Slot};
    use repack::search::{backstep, search};
    use repack::util::{BackstepConfig, SearchConfig, assertions};
    use repack::{default_bound, solve};

    fn motion(rect: RectId, parent: Option<RectId>, slot: ChildSlot) -> Motion {
        Motion {
            rect,
            anchor: Anchor { parent, slot },
            rotated: false,
            assessment: Assessment::new(0, 0, 0.0, Point(0, 0), false),
        }
    }

    fn positions(outline: &Outline, start: NodeKey) -> Vec<Point> {
        outline.walk(start).map(|k| outline.pos(k)).collect()
    }

    fn extent(outline: &Outline, key: NodeKey, dir: Direction) -> Point {
        outline.pos(outline.extent(key, dir))
    }

    fn node(scene: &Scene, parent: RectId, slot: ChildSlot) -> NodeKey {
        scene
            .resolve(Anchor {
                parent: Some(parent),
                slot,
            })
            .unwrap()
    }

    fn random_dims(n: usize, max_side: Coord, rng: &mut impl Rng) -> Vec<(Coord, Coord)> {
        (0..n)
            .map(|_| (rng.random_range(1..=max_side), rng.random_range(1..=max_side)))
            .collect()
    }

    /// Every node of every cycle, hangers first
    fn linked(outline: &Outline) -> Vec<NodeKey> {
        outline
            .hangers()
            .iter()
            .flat_map(|h| outline.walk(h).collect_vec())
            .collect()
    }

    fn cycles(outline: &Outline) -> Vec<Vec<NodeKey>> {
        outline
            .hangers()
            .iter()
            .map(|h| outline.walk(h).collect_vec())
            .collect()
    }

    /// Every placement admitted by the outline, for every size up to `max_side`, misses the
    /// rectangles already placed
    fn assert_admitted_placements_are_free(scene: &Scene, max_side: Coord) {
        let outline = scene.outline();
        let (x_max, y_max) = scene.bounds();
        let placed = scene.placed().filter_map(|r| r.footprint()).collect_vec();
        for key in linked(outline) {
            for (w, h) in (1..=max_side).cartesian_product(1..=max_side) {
                if !outline.is_mergeable(key, w, h) {
                    continue;
                }
                let anchor = outline.frame(key).unwrap().anchor;
                let footprint = Rect::from_anchor(anchor, w, h).unwrap();
                assert!(footprint.is_within(x_max, y_max));
                assert!(
                    placed.iter().all(|p| !p.collides_with(&footprint)),
                    "{w}x{h} admitted at {} overlaps a placed rectangle",
                    outline.pos(key)
                );
            }
        }
    }

    /// Builds the 50x50 stack of four rectangles shared by several tests
    fn stacked_scene(extra: &[(Coord, Coord)]) -> Result<Scene> {
        let dims = [(30, 5), (10, 30), (30, 5), (5, 37)]
            .into_iter()
            .chain(extra.iter().copied())
            .collect_vec();
        let mut scene = Scene::new(50, 50, &dims)?;
        scene.apply(&motion(0, None, ChildSlot::Bottom))?;
        scene.apply(&motion(1, Some(0), ChildSlot::Top))?;
        scene.apply(&motion(2, Some(1), ChildSlot::Top))?;
        scene.apply(&motion(3, Some(0), ChildSlot::Bottom))?;
        Ok(scene)
    }

    #[test]
    fn empty_outline() {
        let outline = Outline::new(50, 50).unwrap();
        let (top, origin) = (outline.top(), outline.origin());
        assert_eq!(positions(&outline, top), vec![Point(50, 50), Point(0, 0)]);
        assert_eq!(outline.shape(top), Shape::Terminal);
        assert_eq!(outline.shape(origin), Shape::Valley);
        assert_eq!(outline.extent(origin, Direction::Left), origin);
        assert_eq!(outline.extent(origin, Direction::Down), origin);
        assert_eq!(outline.extent(origin, Direction::Right), top);
        assert_eq!(outline.extent(origin, Direction::Up), top);
        assert_eq!(outline.slot(origin), Some(Slot { width: 50, height: 50 }));
        assert_eq!(outline.slot(top), None);
        assert!(Outline::new(0, 10).is_err());
    }

    #[test]
    fn stacking_scenario() {
        let dims = [(30, 5), (10, 30), (30, 5), (5, 37)];
        let mut scene = Scene::new(50, 50, &dims).unwrap();
        let top = scene.outline().top();

        scene.apply(&motion(0, None, ChildSlot::Bottom)).unwrap();
        assert_eq!(
            positions(scene.outline(), top),
            vec![Point(50, 50), Point(0, 5), Point(30, 0)]
        );

        scene.apply(&motion(1, Some(0), ChildSlot::Top)).unwrap();
        assert_eq!(
            positions(scene.outline(), top),
            vec![Point(50, 50), Point(0, 35), Point(10, 5), Point(30, 0)]
        );

        scene.apply(&motion(2, Some(1), ChildSlot::Top)).unwrap();
        assert_eq!(
            positions(scene.outline(), top),
            vec![Point(50, 50), Point(0, 40), Point(30, 35), Point(10, 5), Point(30, 0)]
        );

        scene.apply(&motion(3, Some(0), ChildSlot::Bottom)).unwrap();
        assert_eq!(
            positions(scene.outline(), top),
            vec![
                Point(50, 50),
                Point(0, 40),
                Point(30, 35),
                Point(10, 5),
                Point(30, 37),
                Point(35, 0)
            ]
        );

        let expected = [Point(0, 0), Point(0, 5), Point(0, 35), Point(30, 0)];
        for (rect, pos) in scene.rects().iter().zip(expected) {
            assert_eq!(rect.position, Some(pos));
        }
        assert!(scene.reservoir().is_empty());
        scene.validate().unwrap();
    }

    #[test]
    fn extents_after_stacking() {
        let scene = stacked_scene(&[]).unwrap();
        let outline = scene.outline();
        let top = Point(50, 50);

        let n4 = node(&scene, 1, ChildSlot::Bottom);
        let n6 = node(&scene, 2, ChildSlot::Bottom);
        let n7 = node(&scene, 3, ChildSlot::Top);
        let n8 = node(&scene, 3, ChildSlot::Bottom);

        assert_eq!(outline.shape(n4), Shape::Valley);
        assert_eq!(outline.shape(n6), Shape::Wall);
        assert_eq!(outline.shape(n7), Shape::Floor);
        assert_eq!(outline.shape(n8), Shape::Valley);

        assert_eq!(extent(outline, n6, Direction::Down), Point(10, 5));
        assert_eq!(extent(outline, n6, Direction::Right), Point(30, 37));
        assert_eq!(extent(outline, n6, Direction::Left), Point(30, 35));
        assert_eq!(extent(outline, n6, Direction::Up), top);

        assert_eq!(extent(outline, n4, Direction::Up), Point(30, 35));
        assert_eq!(extent(outline, n4, Direction::Right), Point(30, 37));
        assert_eq!(extent(outline, n4, Direction::Left), Point(10, 5));

        assert_eq!(extent(outline, n7, Direction::Left), Point(30, 35));
        assert_eq!(extent(outline, n7, Direction::Up), top);
        assert_eq!(extent(outline, n7, Direction::Right), top);

        assert_eq!(outline.extent(n8, Direction::Left), n8);
        assert_eq!(outline.extent(n8, Direction::Down), n8);
        assert_eq!(extent(outline, n8, Direction::Up), top);
        assert_eq!(extent(outline, n8, Direction::Right), top);

        // the wall at (30, 35) is pinched shut by the rectangle at (30, 0)
        assert_eq!(outline.slot(n6).map(|s| s.width), Some(0));
        assert!(!outline.is_mergeable(n6, 1, 31));
        assert_eq!(outline.slot(n4), Some(Slot { width: 20, height: 30 }));
    }

    #[test]
    fn every_extent_resolves_to_its_own_cycle() {
        let mut rng = SmallRng::seed_from_u64(7);
        let dims = random_dims(30, 15, &mut rng);
        let bound = default_bound(&dims, 1.01).unwrap();
        let mut scene = Scene::new(bound, bound, &dims).unwrap();
        scene.prepare(SortKey::AreaWidth);
        scene.plan().unwrap();

        let outline = scene.outline();
        for hanger in outline.hangers().iter() {
            let cycle = outline.walk(hanger).collect_vec();
            for &key in &cycle {
                let ext = outline.node(key).extents;
                assert!(ext.iter().all(|e| cycle.contains(&e)));
            }
        }
    }

    #[test]
    fn merge_split_round_trip() {
        let mut scene = stacked_scene(&[]).unwrap();
        let top = scene.outline().top();
        let n2 = node(&scene, 0, ChildSlot::Bottom);

        scene.revert(3).unwrap();
        assert_eq!(
            positions(scene.outline(), top),
            vec![Point(50, 50), Point(0, 40), Point(30, 35), Point(10, 5), Point(30, 0)]
        );
        assert_eq!(scene.reservoir(), &[3]);
        assert_eq!(scene.rect(3).position, None);
        assert_eq!(scene.rect(3).last_owner, Some(n2));

        // merging again yields the same outline
        scene.apply(&motion(3, Some(0), ChildSlot::Bottom)).unwrap();
        assert_eq!(scene.rect(3).position, Some(Point(30, 0)));
        assert_eq!(positions(scene.outline(), top).len(), 6);
        scene.validate().unwrap();
    }

    #[test]
    fn floor_merge_spawns_hanger() {
        let mut scene = stacked_scene(&[(10, 10)]).unwrap();
        let top = scene.outline().top();
        let n7 = node(&scene, 3, ChildSlot::Top);
        let n4 = node(&scene, 1, ChildSlot::Bottom);
        let before = positions(scene.outline(), top);

        let frame = scene.outline().frame(n7).unwrap();
        assert_eq!(frame.anchor, Point(30, 37));
        assert_eq!(frame.slot, Slot { width: 20, height: 13 });
        assert_eq!(frame.x_gap, 0);

        scene.apply(&motion(4, Some(3), ChildSlot::Top)).unwrap();
        let outline = scene.outline();
        assert_eq!(scene.rect(4).position, Some(Point(30, 37)));
        assert_eq!(outline.hangers().len(), 2);
        assert_eq!(outline.shape(n7), Shape::Terminal);
        assert_eq!(
            positions(outline, top),
            vec![
                Point(50, 50),
                Point(0, 40),
                Point(30, 47),
                Point(40, 37),
                Point(35, 0)
            ]
        );
        assert_eq!(
            positions(outline, n7),
            vec![Point(30, 37), Point(30, 35), Point(10, 5)]
        );
        assert_eq!(outline.hanger_of(n4), Some(n7));
        assert_eq!(outline.slot(n4), Some(Slot { width: 20, height: 30 }));

        scene.revert(4).unwrap();
        assert_eq!(scene.outline().hangers().len(), 1);
        assert_eq!(positions(scene.outline(), top), before);
        scene.validate().unwrap();
    }

    #[test]
    fn wall_merge_drops_onto_floor() {
        let dims = [(30, 5), (10, 30), (30, 5), (10, 40)];
        let mut scene = Scene::new(50, 50, &dims).unwrap();
        scene.apply(&motion(0, None, ChildSlot::Bottom)).unwrap();
        scene.apply(&motion(1, Some(0), ChildSlot::Top)).unwrap();
        scene.apply(&motion(2, Some(1), ChildSlot::Top)).unwrap();
        let top = scene.outline().top();
        let n6 = node(&scene, 2, ChildSlot::Bottom);
        let n4 = node(&scene, 1, ChildSlot::Bottom);
        let before = positions(scene.outline(), top);

        let frame = scene.outline().frame(n6).unwrap();
        assert_eq!(frame.anchor, Point(30, 5));
        assert_eq!(frame.slot, Slot { width: 20, height: 45 });
        assert_eq!(frame.y_gap, 30);
        // too short to span the gap under the wall
        assert!(!scene.outline().is_mergeable(n6, 10, 30));

        scene.apply(&motion(3, Some(2), ChildSlot::Bottom)).unwrap();
        let outline = scene.outline();
        assert_eq!(scene.rect(3).position, Some(Point(30, 5)));
        assert_eq!(outline.hangers().len(), 2);
        assert_eq!(
            positions(outline, top),
            vec![
                Point(50, 50),
                Point(0, 40),
                Point(30, 45),
                Point(40, 5),
                Point(30, 0)
            ]
        );
        assert_eq!(positions(outline, n6), vec![Point(30, 35), Point(10, 5)]);
        assert_eq!(outline.shape(n4), Shape::Valley);
        assert_eq!(outline.slot(n4), Some(Slot { width: 20, height: 30 }));

        scene.revert(3).unwrap();
        assert_eq!(positions(scene.outline(), top), before);
        assert_eq!(scene.outline().hangers().len(), 1);
        scene.validate().unwrap();
    }

    #[test]
    fn cascaded_split_dismantles_stack() {
        let mut scene = stacked_scene(&[(10, 10)]).unwrap();
        scene.apply(&motion(4, Some(3), ChildSlot::Top)).unwrap();
        let top = scene.outline().top();

        let removed = scene.cascade(0).unwrap();
        assert_eq!(removed, vec![4, 2, 3, 1, 0]);
        assert_eq!(
            positions(scene.outline(), top),
            vec![Point(50, 50), Point(0, 0)]
        );
        assert_eq!(scene.outline().hangers().len(), 1);
        assert_eq!(scene.reservoir(), &[0, 1, 2, 3, 4]);
        assert_eq!(scene.outline().n_retired(), 10);
        assert_eq!(scene.recycle(), 10);
        assert_eq!(scene.outline().n_nodes(), 2);
        scene.validate().unwrap();
    }

    #[test]
    fn precondition_violations_fail() {
        let mut scene = stacked_scene(&[(10, 10), (60, 1)]).unwrap();
        // rectangle already placed
        assert!(scene.apply(&motion(0, None, ChildSlot::Bottom)).is_err());
        // origin was merged already
        assert!(scene.apply(&motion(4, None, ChildSlot::Bottom)).is_err());
        // terminal is never a merge anchor
        assert!(scene.apply(&motion(4, None, ChildSlot::Top)).is_err());
        // rectangle 1 has a placement stacked on its top node
        assert!(scene.revert(1).is_err());
        // not placed
        assert!(scene.revert(4).is_err());
        // never fits
        assert!(scene.apply(&motion(5, Some(3), ChildSlot::Top)).is_err());
        scene.validate().unwrap();
    }

    #[test]
    fn infeasible_rectangles_are_reported() {
        let mut scene = Scene::new(10, 10, &[(8, 8), (5, 5), (11, 1)]).unwrap();
        let report = scene.plan().unwrap();
        assert_eq!(report.placed, vec![0]);
        assert_eq!(report.infeasible, vec![1, 2]);
        assert_eq!(scene.reservoir(), &[1, 2]);
        scene.validate().unwrap();
    }

    #[test]
    fn identical_squares_occupancy() {
        let report = solve((100, 100), &[(10, 10); 8], SortKey::Area).unwrap();
        assert!(approx_eq!(f64, report.occupancy, 0.08, ulps = 2));
        assert_eq!(report.bounding, (100, 100));
        assert!(report.infeasible.is_empty());
        assert!(report.rects.iter().all(|r| !r.rotated));

        let footprints = report
            .rects
            .iter()
            .map(|r| r.footprint().unwrap())
            .collect_vec();
        assert!(
            footprints
                .iter()
                .tuple_combinations()
                .all(|(a, b)| !a.collides_with(b))
        );
    }

    #[test_case(0; "seed_0")]
    #[test_case(1; "seed_1")]
    #[test_case(2; "seed_2")]
    #[test_case(3; "seed_3")]
    fn greedy_packing_properties(seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let dims = random_dims(40, 20, &mut rng);
        let bound = default_bound(&dims, 1.01).unwrap();
        let mut scene = Scene::new(bound, bound, &dims).unwrap();
        scene.prepare(SortKey::Area);
        let report = scene.plan().unwrap();

        assert!(report.infeasible.is_empty());
        assert_eq!(scene.n_placed(), dims.len());
        scene.validate().unwrap();

        let (w, h) = scene.bounding();
        let occupancy = scene.occupancy_rate();
        assert!(occupancy > 0.0 && occupancy <= 1.0);
        assert!(approx_eq!(
            f64,
            occupancy,
            scene.placed_area() as f64 / (w * h) as f64,
            ulps = 2
        ));
        for r in scene.placed() {
            let f = r.footprint().unwrap();
            assert!(f.is_within(bound, bound));
        }

        // unwinding every placement in reverse restores the empty outline
        for &id in report.placed.iter().rev() {
            scene.revert(id).unwrap();
        }
        let top = scene.outline().top();
        assert_eq!(
            positions(scene.outline(), top),
            vec![Point(bound, bound), Point(0, 0)]
        );
        assert_eq!(scene.reservoir().len(), dims.len());
        scene.validate().unwrap();
    }

    #[test_case(4; "seed_4")]
    #[test_case(5; "seed_5")]
    fn perturb_and_random_replan(seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let dims = random_dims(25, 12, &mut rng);
        let bound = default_bound(&dims, 1.01).unwrap();
        let mut scene = Scene::new(bound, bound, &dims).unwrap();
        scene.prepare(SortKey::Perimeter);
        scene.plan().unwrap();
        let snapshot = scene.save();
        let positions_before = scene.rects().iter().map(|r| r.position).collect_vec();

        let removed = scene.perturb(&mut rng, 5).unwrap();
        assert!(!removed.is_empty());
        assert_eq!(scene.reservoir().len(), removed.len());
        scene.validate().unwrap();

        let report = scene.plan_random(&mut rng).unwrap();
        assert_eq!(report.placed.len() + report.infeasible.len(), removed.len());
        scene.validate().unwrap();

        scene.restore(&snapshot);
        assert_eq!(
            scene.rects().iter().map(|r| r.position).collect_vec(),
            positions_before
        );
        scene.validate().unwrap();
    }

    #[test]
    fn fitting_shrinks_scene_to_content() {
        let mut rng = SmallRng::seed_from_u64(11);
        let dims = random_dims(20, 10, &mut rng);
        let mut scene = Scene::new(500, 500, &dims).unwrap();
        scene.prepare(SortKey::LongSide);
        scene.plan().unwrap();

        scene.fit().unwrap();
        assert_eq!(scene.bounding(), scene.content_bounds());
        assert_eq!(scene.bounds(), scene.content_bounds());
        assert!(approx_eq!(
            f64,
            scene.occupancy_rate(),
            scene.density(),
            ulps = 2
        ));
        scene.validate().unwrap();
    }

    #[test]
    fn backtracking_beats_or_matches_greedy() {
        let dims = [(4, 3), (3, 3), (2, 5), (5, 1), (2, 2), (1, 4)];

        let mut greedy = Scene::new(20, 20, &dims).unwrap();
        greedy.prepare(SortKey::Area);
        greedy.plan().unwrap();
        let (gw, gh) = greedy.content_bounds();

        let mut scene = Scene::new(20, 20, &dims).unwrap();
        scene.prepare(SortKey::Area);
        let config = SearchConfig {
            branching: 3,
            max_nodes: 5_000,
        };
        let outcome = search(&mut scene, config).unwrap();
        assert_eq!(outcome.motions.len(), dims.len());
        assert!(outcome.area <= gw * gh);

        // the search left the scene as it found it
        assert_eq!(scene.n_placed(), 0);
        assert_eq!(scene.outline().n_nodes(), 2);
        scene.validate().unwrap();

        outcome.replay(&mut scene).unwrap();
        let (w, h) = scene.content_bounds();
        assert_eq!(w * h, outcome.area);
        assert_eq!(scene.n_placed(), dims.len());
        scene.validate().unwrap();
    }

    #[test]
    fn backstep_exploration_is_reverted() {
        let mut rng = SmallRng::seed_from_u64(3);
        let dims = random_dims(12, 10, &mut rng);
        let bound = default_bound(&dims, 1.01).unwrap();
        let mut scene = Scene::new(bound, bound, &dims).unwrap();
        scene.prepare(SortKey::Area);
        scene.plan().unwrap();
        let (w, h) = scene.content_bounds();
        let top = scene.outline().top();
        let outline_before = positions(scene.outline(), top);
        let rects_before = scene.rects().to_vec();

        let config = BackstepConfig {
            depth: 2,
            branching: 4,
        };
        let outcome = backstep(&mut scene, config).unwrap();
        assert_eq!(outcome.unplaced, 0);
        assert!(outcome.area <= w * h);
        assert!(outcome.removals.len() <= config.depth);

        assert_eq!(positions(scene.outline(), top), outline_before);
        assert_eq!(scene.outline().n_retired(), 0);
        for (now, before) in scene.rects().iter().zip(&rects_before) {
            assert_eq!(now.position, before.position);
            assert_eq!(now.rotated, before.rotated);
        }
        scene.validate().unwrap();

        outcome.replay(&mut scene).unwrap();
        let (w, h) = scene.content_bounds();
        assert_eq!(w * h, outcome.area);
        assert!(scene.reservoir().is_empty());
        scene.validate().unwrap();
    }

    #[test]
    fn sort_keys_order_largest_first() {
        let scene = Scene::new(10, 10, &[(1, 6), (3, 3), (2, 4), (8, 1)]).unwrap();
        let rects = scene.rects();
        assert_eq!(SortKey::Area.order(rects), vec![1, 2, 3, 0]);
        assert_eq!(SortKey::AreaWidth.order(rects), vec![1, 3, 2, 0]);
        assert_eq!(SortKey::Perimeter.order(rects), vec![3, 0, 1, 2]);
        assert_eq!(SortKey::LongSide.order(rects), vec![3, 0, 2, 1]);
        assert_eq!(SortKey::Input.order(rects), vec![0, 1, 2, 3]);
    }

    #[test_case(534; "seed_534")]
    #[test_case(7; "seed_7")]
    #[test_case(21; "seed_21")]
    #[test_case(1000; "seed_1000")]
    fn dense_random_placements_never_overlap(seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let dims = random_dims(40, 3, &mut rng);
        let mut scene = Scene::new(12, 12, &dims).unwrap();
        scene.prepare(SortKey::Input);

        for round in 0..5 {
            if round > 0 {
                scene.perturb(&mut rng, 6).unwrap();
            }
            for id in scene.reservoir().to_vec() {
                assert_admitted_placements_are_free(&scene, 3);
                scene.place_random(id, &mut rng).unwrap();
            }
            assert_admitted_placements_are_free(&scene, 3);
            assert!(assertions::placements_are_enclosed(&scene));
            assert!(assertions::extents_match_ray_cast(scene.outline()));
            scene.validate().unwrap();
        }
        assert!(scene.n_placed() > 15);
    }

    #[test_case(11; "seed_11")]
    #[test_case(12; "seed_12")]
    #[test_case(13; "seed_13")]
    fn outline_merges_unwind_in_reverse(seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut outline = Outline::new(16, 16).unwrap();
        let mut history = vec![];

        for rect in 0..60 {
            let (w, h) = (rng.random_range(1..=4), rng.random_range(1..=4));
            let candidates = linked(&outline)
                .into_iter()
                .filter(|&k| outline.is_mergeable(k, w, h))
                .collect_vec();
            let Some(&key) = candidates.choose(&mut rng) else {
                continue;
            };
            let before = cycles(&outline);
            let merged = outline.merge(key, w, h, rect).unwrap();
            assert_eq!(outline.node(key).rect(), Some(rect));
            assert!(!outline.is_free(&Rect::from_anchor(merged.anchor, w, h).unwrap()));
            assert!(!outline.is_mergeable(key, w, h));
            history.push((key, before));
        }
        assert!(history.len() > 10);

        while let Some((key, before)) = history.pop() {
            assert!(outline.is_splittable(key));
            let detachment = outline.split(key).unwrap();
            assert_eq!(detachment.parent, key);
            assert_eq!(cycles(&outline), before);
            assert!(assertions::extents_match_ray_cast(&outline));
        }
        assert_eq!(outline.hangers().len(), 1);
        let n_retired = outline.n_retired();
        assert_eq!(outline.n_nodes() - n_retired, 2);
        assert_eq!(outline.recycle(), n_retired);
        assert!(outline.is_free(&Rect::try_new(0, 0, 16, 16).unwrap()));
    }

    #[test_case(31; "seed_31")]
    #[test_case(32; "seed_32")]
    fn incremental_extents_follow_random_edits(seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut outline = Outline::new(20, 14).unwrap();
        let mut merged: Vec<NodeKey> = vec![];
        let (mut n_merges, mut n_splits) = (0, 0);

        for rect in 0..240 {
            match !merged.is_empty() && rng.random_bool(0.3) {
                true => {
                    let splittable = merged
                        .iter()
                        .copied()
                        .filter(|&k| outline.is_splittable(k))
                        .collect_vec();
                    if let Some(&key) = splittable.choose(&mut rng) {
                        outline.split(key).unwrap();
                        merged.retain(|&k| k != key);
                        n_splits += 1;
                    }
                }
                false => {
                    let (w, h) = (rng.random_range(1..=5), rng.random_range(1..=4));
                    let candidates = linked(&outline)
                        .into_iter()
                        .filter(|&k| outline.is_mergeable(k, w, h))
                        .collect_vec();
                    if let Some(&key) = candidates.choose(&mut rng) {
                        outline.merge(key, w, h, rect).unwrap();
                        merged.push(key);
                        n_merges += 1;
                    }
                }
            }
            assert!(assertions::extents_match_ray_cast(&outline));
            if rect % 60 == 59 {
                outline.recycle();
            }
        }
        assert!(n_merges > 20 && n_splits > 5);
        assert!(assertions::outline_is_consistent(&outline));
    }
}
