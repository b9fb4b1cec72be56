use levelgraph::UnorderedVec;

fn sorted<T: Ord + Clone>(v: &UnorderedVec<T>) -> Vec<T> {
    let mut out: Vec<T> = v.iter().cloned().collect();
    out.sort();
    out
}

#[test]
fn removal_keeps_every_other_element() {
    let source: Vec<u32> = (0..12).collect();
    for victim in 0..source.len() {
        let mut v: UnorderedVec<u32> = source.iter().copied().collect();
        let removed = v.swap_remove(victim);
        assert_eq!(removed, source[victim]);
        assert_eq!(v.len(), source.len() - 1);

        let expected: Vec<u32> = source.iter().copied().filter(|&x| x != removed).collect();
        assert_eq!(sorted(&v), expected);
        if victim + 1 < source.len() {
            assert_eq!(v[victim], 11, "last element fills the hole");
        }
    }
}

#[test]
fn remove_item_drops_first_match_only() {
    let mut v: UnorderedVec<char> = "abcab".chars().collect();
    assert_eq!(v.remove_item(&'a'), Some('a'));
    assert_eq!(v.as_slice(), &['b', 'b', 'c', 'a']);
    assert_eq!(v.remove_item(&'z'), None);
    assert!(v.contains(&'a'));
}

#[test]
fn draining_from_the_front_visits_everything() {
    let mut v: UnorderedVec<u32> = (1..=5).collect();
    let mut seen = Vec::new();
    while !v.is_empty() {
        seen.push(v.swap_remove(0));
    }
    seen.sort();
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    assert_eq!(v.last_index(), None);
}

#[test]
fn push_reports_slot_and_indexing_follows() {
    let mut v = UnorderedVec::with_capacity(2);
    assert_eq!(v.push("x"), 0);
    assert_eq!(v.push("y"), 1);
    v[0] = "z";
    assert_eq!(v.get(0), Some(&"z"));
    assert_eq!(v.get(2), None);
    assert_eq!(v.last_index(), Some(1));
    v.clear();
    assert!(v.is_empty());
}
