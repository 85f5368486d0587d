#[cfg(feature = "python")]
pub mod py_wrappers;

use std::fmt;

use arrayvec::ArrayVec;
use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::{
    config::{Configuration, Palette},
    error::Result,
    fruit::Fruit,
    ghost_agent::{ChaseTargets, Ghost, GhostKind, GhostState},
    grid::{Board, Point},
    player::Player,
    variables::{
        Cell, Direction, ALL_GHOSTS_EATEN_BONUS, ALL_GHOSTS_EATEN_ROUNDS, DOT_SCORE,
        GHOST_EAT_SCORES, KILL_SCREEN_ODDS, MAX_GHOSTS, POWER_PELLET_SCORE, STARTING_LIVES,
    },
};

/// The simulation: owns the board and every actor, and applies the game
/// rules each time an actor enters a new cell.
///
/// The host calls [`Game::tick`] once per frame and reads the accessors to
/// draw. Nothing here is shared across threads.
#[derive(Clone, Debug)]
pub struct Game {
    config: Configuration,
    board: Board,
    player: Player,
    fruit: Fruit,
    ghosts: Vec<Ghost>,
    rng: StdRng,

    screen_width: f32,
    screen_height: f32,
    cell_width: f32,
    cell_height: f32,

    score: u32,
    lives: u8,
    /// Starts at 1 for the first level of a game.
    level: u32,
    dots_eaten: u32,
    dots_remaining: u32,
    bonus_life_granted: bool,
    /// Ghosts eaten since the last power pellet.
    fleeing_ghosts_eaten: u32,
    /// Fleeing windows this level in which every ghost got eaten.
    all_ghosts_eaten_count: u32,
    kill_screen: bool,
    tick_count: u64,
}

impl Game {
    /// Creates a game for an `icon_rows` x `icon_cols` home screen drawn on a
    /// surface of the given size, with every other setting at its default.
    pub fn new(
        icon_rows: usize,
        icon_cols: usize,
        screen_width: f32,
        screen_height: f32,
    ) -> Result<Self> {
        let config = Configuration {
            icon_rows,
            icon_cols,
            ..Configuration::default()
        };
        Self::with_configuration(config, screen_width, screen_height, None)
    }

    /// Creates a game from a full configuration. With a `seed`, every random
    /// decision the game makes is reproducible.
    pub fn with_configuration(
        config: Configuration,
        screen_width: f32,
        screen_height: f32,
        seed: Option<u64>,
    ) -> Result<Self> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut game = Self {
            board: build_board(&config),
            player: Player::new(config.player_strategy),
            fruit: Fruit::new(),
            ghosts: build_ghosts(&config),
            config,
            rng,
            screen_width,
            screen_height,
            cell_width: 0.0,
            cell_height: 0.0,
            score: 0,
            lives: STARTING_LIVES,
            level: 0,
            dots_eaten: 0,
            dots_remaining: 0,
            bonus_life_granted: false,
            fleeing_ghosts_eaten: 0,
            all_ghosts_eaten_count: 0,
            kill_screen: false,
            tick_count: 0,
        };
        game.perform_resize(screen_width, screen_height);
        game.new_game();
        Ok(game)
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.config.palette
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The kind of the cell at (x, y), or None if it is off the board.
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.board.get(Point::new(x, y))
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn fruit(&self) -> &Fruit {
        &self.fruit
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn dots_eaten(&self) -> u32 {
        self.dots_eaten
    }

    pub fn dots_remaining(&self) -> u32 {
        self.dots_remaining
    }

    pub fn is_bonus_life_granted(&self) -> bool {
        self.bonus_life_granted
    }

    /// Whether this level should be drawn with the kill screen glitch.
    pub fn is_kill_screen(&self) -> bool {
        self.kill_screen
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    pub fn cells_wide(&self) -> usize {
        self.board.cells_wide()
    }

    pub fn cells_tall(&self) -> usize {
        self.board.cells_tall()
    }

    /// Frames simulated so far, including those spent on the death animation.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Records the direction the user swiped toward.
    pub fn set_wants_to_go(&mut self, direction: Direction) {
        self.player.request_direction(direction);
    }

    /// Adapts to a new surface size. Only cell geometry and actor locations
    /// change; the board, actor cells and every counter are kept.
    pub fn perform_resize(&mut self, screen_width: f32, screen_height: f32) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
        self.cell_width = screen_width / self.board.cells_wide() as f32;
        self.cell_height = screen_height / self.board.cells_tall() as f32;

        let (width, height) = (self.cell_width, self.cell_height);
        self.player.actor.resize_to(width, height);
        self.fruit.actor.resize_to(width, height);
        for ghost in &mut self.ghosts {
            ghost.actor.resize_to(width, height);
        }
        debug!(
            screen_width,
            screen_height,
            cell_width = width,
            cell_height = height,
            "resized"
        );
    }

    /// Applies changed settings. Settings that only affect play take effect
    /// immediately; a different board shape or ghost count starts a new game.
    pub fn apply_configuration(&mut self, config: Configuration) -> Result<()> {
        config.validate()?;
        let rebuild = self.config.changes_layout(&config);
        self.player.set_mode(config.player_strategy);
        self.config = config;
        if rebuild {
            info!(
                icon_rows = self.config.icon_rows,
                icon_cols = self.config.icon_cols,
                ghosts = self.config.ghost_count,
                "layout changed, starting over"
            );
            self.board = build_board(&self.config);
            self.ghosts = build_ghosts(&self.config);
            self.perform_resize(self.screen_width, self.screen_height);
            self.new_game();
        }
        Ok(())
    }

    /// Resets lives, score and level, then starts the first level.
    pub fn new_game(&mut self) {
        info!("new game");
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.level = 0;
        self.bonus_life_granted = false;
        self.new_level();
    }

    /// Advances to the next level on a freshly generated board.
    pub fn new_level(&mut self) {
        self.level += 1;
        self.kill_screen = self.level > 1
            && self.config.kill_screen_enabled
            && self.rng.gen_ratio(1, KILL_SCREEN_ODDS);

        self.board.regenerate();
        self.dots_remaining = self.board.count(Cell::Dot) as u32;
        self.dots_eaten = 0;
        self.fleeing_ghosts_eaten = 0;
        self.all_ghosts_eaten_count = 0;
        self.reset_actors();

        debug!(
            level = self.level,
            kill_screen = self.kill_screen,
            dots = self.dots_remaining,
            "new level"
        );
    }

    /// Advances the simulation by one frame.
    ///
    /// The player moves first, then the fruit, then the ghosts, so the
    /// player's collision checks see where the ghosts were last tick.
    pub fn tick(&mut self) -> Result<()> {
        self.tick_count += 1;
        if self.player.is_dead() {
            self.player.tick();
            if self.player.is_death_animation_finished() {
                self.finish_death();
            }
            return Ok(());
        }

        if self.player.tick() {
            self.player_moved()?;
            if self.player.is_dead() {
                return Ok(());
            }
        }
        self.fruit.tick();
        for index in 0..self.ghosts.len() {
            if self.ghosts[index].tick() {
                self.ghost_moved(index);
                if self.player.is_dead() {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Puts every actor back at its spawn for a new level or a new life.
    fn reset_actors(&mut self) {
        let spawn = self.board.player_spawn();
        self.player.new_life(&self.board, spawn, &mut self.rng);

        let count = self.ghosts.len();
        for (index, ghost) in self.ghosts.iter_mut().enumerate() {
            let spawn = self.board.ghost_spawn(index, count);
            ghost.new_life(&self.board, spawn, &mut self.rng);
        }
        self.fruit.new_life(self.board.center());
    }

    /// Handles the player entering a new cell: eat, collide, then steer.
    fn player_moved(&mut self) -> Result<()> {
        if self.eat_under_player() {
            return Ok(());
        }
        self.check_fruit();
        self.check_ghosts();
        if self.player.is_dead() {
            return Ok(());
        }

        let ghosts: ArrayVec<Point, MAX_GHOSTS> = self
            .ghosts
            .iter()
            .map(|ghost| ghost.actor.position())
            .collect();
        let next = self
            .player
            .choose_next_direction(&self.board, &ghosts, &mut self.rng)?;
        self.player.actor.set_next_direction(next);
        Ok(())
    }

    /// Handles a ghost entering a new cell: steer, then check whether it
    /// walked into the player.
    fn ghost_moved(&mut self, index: usize) {
        let targets = self.chase_targets();
        let ghost = &mut self.ghosts[index];
        let next = ghost.choose_next_direction(&self.board, &targets, &mut self.rng);
        ghost.actor.set_next_direction(next);

        if ghost.actor.is_colliding_with(&self.player.actor) {
            self.resolve_ghost_collision(index);
        }
    }

    fn chase_targets(&self) -> ChaseTargets {
        ChaseTargets {
            player_position: self.player.actor.position(),
            player_heading: self.player.actor.current_direction(),
            blinky_position: self
                .ghosts
                .iter()
                .find(|ghost| ghost.kind() == GhostKind::Blinky)
                .map(|ghost| ghost.actor.position()),
        }
    }

    /// Eats whatever is in the player's cell. Returns true if that cleared
    /// the level.
    fn eat_under_player(&mut self) -> bool {
        let position = self.player.actor.position();
        match self.board.eat(position) {
            Some(Cell::Dot) => {
                self.dots_eaten += 1;
                self.dots_remaining = self.dots_remaining.saturating_sub(1);
                self.add_to_score(DOT_SCORE);
                trace!(?position, remaining = self.dots_remaining, "dot eaten");

                if self.dots_remaining == 0 {
                    self.new_level();
                    return true;
                }
                if self.fruit.is_due(self.dots_eaten) {
                    self.fruit.show(self.board.center(), self.level);
                    debug!(kind = ?self.fruit.kind(), "fruit appeared");
                }
            }
            Some(Cell::PowerPellet) => {
                self.add_to_score(POWER_PELLET_SCORE);
                self.fleeing_ghosts_eaten = 0;
                for ghost in &mut self.ghosts {
                    ghost.set_state(GhostState::Fleeing);
                }
                debug!(?position, "power pellet eaten");
            }
            _ => {}
        }
        false
    }

    fn check_fruit(&mut self) {
        if self.fruit.is_visible() && self.player.actor.is_colliding_with(&self.fruit.actor) {
            let points = self.fruit.kind().points();
            self.fruit.hide();
            self.add_to_score(points);
            debug!(kind = ?self.fruit.kind(), points, "fruit eaten");
        }
    }

    fn check_ghosts(&mut self) {
        for index in 0..self.ghosts.len() {
            if self.player.is_dead() {
                break;
            }
            let ghost = &self.ghosts[index];
            if ghost.actor.is_colliding_with(&self.player.actor) {
                self.resolve_ghost_collision(index);
            }
        }
    }

    /// Applies the outcome of the player and a ghost sharing a cell, based
    /// on the ghost's state before contact.
    fn resolve_ghost_collision(&mut self, index: usize) {
        match self.ghosts[index].state() {
            GhostState::Hunting | GhostState::EyesOnly => self.kill_player(),
            GhostState::Fleeing => {
                self.ghosts[index].set_state(GhostState::EyesOnly);
                self.fleeing_ghosts_eaten += 1;
                let rank = (self.fleeing_ghosts_eaten as usize - 1).min(MAX_GHOSTS - 1);
                let points = GHOST_EAT_SCORES[rank];
                self.add_to_score(points);
                debug!(kind = ?self.ghosts[index].kind(), points, "ghost eaten");

                if self.fleeing_ghosts_eaten == self.ghosts.len() as u32 {
                    self.all_ghosts_eaten_count += 1;
                    if self.all_ghosts_eaten_count == ALL_GHOSTS_EATEN_ROUNDS {
                        self.add_to_score(ALL_GHOSTS_EATEN_BONUS);
                        info!(
                            bonus = ALL_GHOSTS_EATEN_BONUS,
                            "every ghost eaten on every pellet"
                        );
                    }
                }
            }
        }
    }

    /// The single path through which points are awarded.
    fn add_to_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.config.bonus_life_enabled
            && !self.bonus_life_granted
            && self.score > self.config.bonus_life_threshold
        {
            self.bonus_life_granted = true;
            self.lives = self.lives.saturating_add(1);
            info!(score = self.score, lives = self.lives, "bonus life");
        }
    }

    fn kill_player(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.player.die();
        let position = self.player.actor.position();
        debug!(?position, lives = self.lives, "player died");
    }

    /// Called once the death animation has played out.
    fn finish_death(&mut self) {
        if self.lives == 0 {
            info!(score = self.score, level = self.level, "game over");
            self.new_game();
        } else {
            self.fleeing_ghosts_eaten = 0;
            self.reset_actors();
        }
    }

    fn glyph(&self, point: Point) -> char {
        if self.player.actor.position() == point {
            return if self.player.is_dead() { 'X' } else { '@' };
        }
        if let Some(ghost) = self.ghosts.iter().find(|g| g.actor.position() == point) {
            return match ghost.state() {
                GhostState::Hunting => match ghost.kind() {
                    GhostKind::Blinky => 'B',
                    GhostKind::Pinky => 'P',
                    GhostKind::Inky => 'I',
                    GhostKind::Clyde => 'C',
                },
                GhostState::Fleeing => 'f',
                GhostState::EyesOnly => '"',
            };
        }
        if self.fruit.is_visible() && self.fruit.actor.position() == point {
            return '%';
        }
        match self.board.get(point) {
            Some(Cell::Wall) => '#',
            Some(Cell::Dot) => '.',
            Some(Cell::PowerPellet) => 'o',
            _ => ' ',
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (score, lives, level) = (self.score, self.lives, self.level);
        let banner = if self.kill_screen {
            "  [KILL SCREEN]"
        } else {
            ""
        };
        writeln!(f, "Score: {score}  Lives: {lives}  Level: {level}{banner}")?;
        let rows = (0..self.board.cells_tall() as i32).map(|y| {
            (0..self.board.cells_wide() as i32)
                .map(|x| self.glyph(Point::new(x, y)))
                .collect::<String>()
        });
        write!(f, "{}", rows.format("\n"))
    }
}

fn build_board(config: &Configuration) -> Board {
    Board::new(
        config.icon_rows,
        config.icon_cols,
        config.cells_between_rows,
        config.cells_between_cols,
    )
}

fn build_ghosts(config: &Configuration) -> Vec<Ghost> {
    GhostKind::ALL
        .into_iter()
        .take(config.ghost_count)
        .map(Ghost::new)
        .collect()
}
