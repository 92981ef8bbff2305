use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if a position is occupied by any segment, including the head
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check whether moving the head to `pos` would collide with the body.
    ///
    /// When the snake is not growing, the tail vacates its cell in the same
    /// tick, so that cell does not count as blocked.
    pub fn would_collide(&self, pos: Position, growing: bool) -> bool {
        let occupied = if growing {
            &self.body[..]
        } else {
            &self.body[..self.body.len() - 1]
        };
        occupied.contains(&pos)
    }

    /// Move snake in current direction, growing if should_grow is true
    pub fn move_snake(&mut self, should_grow: bool) {
        let new_head = self.head().moved_in_direction(self.direction);
        self.body.insert(0, new_head);

        if !should_grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Food items currently on the board
    pub foods: Vec<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, foods: Vec<Position>, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            foods,
            grid_width,
            grid_height,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check if a position is blocked for movement (wall or snake)
    pub fn is_blocked(&self, pos: Position) -> bool {
        !self.is_in_bounds(pos) || self.snake.occupies(pos)
    }

    /// The food item closest to the snake's head by Manhattan distance
    pub fn nearest_food(&self) -> Option<Position> {
        let head = self.snake.head();
        self.foods
            .iter()
            .copied()
            .min_by_key(|food| food.manhattan_distance(head))
    }

    /// True when every cell adjacent to the head is blocked
    pub fn is_head_trapped(&self) -> bool {
        let head = self.snake.head();
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
        .iter()
        .all(|&dir| self.is_blocked(head.moved_in_direction(dir)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Position::new(2, 3);
        let b = Position::new(5, 1);
        assert_eq!(a.manhattan_distance(b), 5);
        assert_eq!(b.manhattan_distance(a), 5);
        assert_eq!(a.manhattan_distance(a), 0);
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(4, 5));
        assert_eq!(snake.body[2], Position::new(3, 5));
    }

    #[test]
    fn test_single_segment_snake() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 1);
        assert_eq!(snake.len(), 1);
        assert!(snake.body_segments().is_empty());
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        // Move without growing
        snake.move_snake(false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));

        // Move with growing
        snake.move_snake(true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(7, 5));
    }

    #[test]
    fn test_would_collide_excludes_vacating_tail() {
        // Body: head (5,5), (4,5), tail (3,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        // Tail cell is safe when not growing, blocked when growing
        assert!(!snake.would_collide(Position::new(3, 5), false));
        assert!(snake.would_collide(Position::new(3, 5), true));

        // Mid-body cell is always blocked
        assert!(snake.would_collide(Position::new(4, 5), false));
        assert!(snake.would_collide(Position::new(4, 5), true));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            vec![Position::new(8, 8)],
            10,
            10,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(9, 9)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(10, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 10)));
    }

    #[test]
    fn test_nearest_food() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 1),
            vec![Position::new(0, 0), Position::new(6, 5)],
            10,
            10,
        );

        assert_eq!(state.nearest_food(), Some(Position::new(6, 5)));
    }

    #[test]
    fn test_nearest_food_empty_board() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 1),
            Vec::new(),
            10,
            10,
        );
        assert_eq!(state.nearest_food(), None);
    }

    #[test]
    fn test_head_trapped_in_corner() {
        // Head in the top-left corner, body blocking the two open sides
        let snake = Snake {
            body: vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(0, 1),
            ],
            direction: Direction::Left,
        };
        let state = GameState::new(snake, vec![Position::new(5, 5)], 10, 10);

        assert!(state.is_head_trapped());
    }

    #[test]
    fn test_head_not_trapped_in_open_field() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            vec![Position::new(8, 8)],
            10,
            10,
        );
        assert!(!state.is_head_trapped());
    }
}
