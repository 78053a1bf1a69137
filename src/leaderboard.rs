use crate::models::LeaderboardEntry;

fn peer(name: &str, points: u32, avatar_ref: &str, is_local: bool) -> LeaderboardEntry {
    LeaderboardEntry {
        rank: 0,
        name: name.to_string(),
        points,
        avatar_ref: avatar_ref.to_string(),
        is_local,
    }
}

/// Fixed peer set shown next to the local user. Only the local entry's
/// points are live.
pub fn default_peers() -> Vec<LeaderboardEntry> {
    vec![
        peer("Patricia M.", 485, "/mature-woman-smiling.png", false),
        peer("Jennifer K.", 420, "/professional-woman-diverse.png", false),
        peer("Susan R.", 385, "/confident-woman.png", false),
        peer("You", 0, "/diverse-user-avatars.png", true),
        peer("Maria L.", 275, "/friendly-woman.png", false),
    ]
}

/// Returns a new board with the local user's points filled in, sorted by
/// points descending and ranked `1..=N`. Ties keep input order.
pub fn rank(peers: &[LeaderboardEntry], local_points: u32) -> Vec<LeaderboardEntry> {
    let mut board: Vec<LeaderboardEntry> = peers
        .iter()
        .cloned()
        .map(|mut entry| {
            if entry.is_local {
                entry.points = local_points;
            }
            entry
        })
        .collect();

    board.sort_by(|a, b| b.points.cmp(&a.points));
    for (index, entry) in board.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    board
}

pub fn local_rank(board: &[LeaderboardEntry]) -> Option<usize> {
    board.iter().find(|entry| entry.is_local).map(|entry| entry.rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_dense_and_sorted(board: &[LeaderboardEntry]) {
        for (index, entry) in board.iter().enumerate() {
            assert_eq!(entry.rank, index + 1);
        }
        assert!(board.windows(2).all(|pair| pair[0].points >= pair[1].points));
    }

    #[test]
    fn new_user_sits_at_the_bottom() {
        let board = rank(&default_peers(), 0);
        assert_dense_and_sorted(&board);
        assert_eq!(local_rank(&board), Some(5));
    }

    #[test]
    fn local_user_climbs_to_first() {
        let peers = vec![
            peer("Jennifer K.", 420, "/a.png", false),
            peer("Susan R.", 385, "/b.png", false),
            peer("You", 0, "/c.png", true),
            peer("Maria L.", 275, "/d.png", false),
            peer("Dana P.", 120, "/e.png", false),
        ];
        let board = rank(&peers, 485);
        assert_dense_and_sorted(&board);
        assert_eq!(local_rank(&board), Some(1));
        assert_eq!(board[0].points, 485);
    }

    #[test]
    fn ties_keep_input_order() {
        let board = rank(&default_peers(), 485);
        assert_eq!(board[0].name, "Patricia M.");
        assert_eq!(board[1].name, "You");
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn input_list_is_left_untouched() {
        let peers = default_peers();
        let _ = rank(&peers, 900);
        assert_eq!(peers, default_peers());
    }
}
