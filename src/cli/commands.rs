//! Command implementations for the cafescout CLI.

use log::{debug, info};

use crate::cafe::{Cafe, CafeId, Currency, NewCafe};
use crate::catalog::Catalog;
use crate::chat::{ChatContextBuilder, user_location_line};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::CafeScoutConfig;
use crate::error::{CafeScoutError, Result};
use crate::filter::FilterSet;
use crate::geo::GeoPoint;
use crate::location::{FixedLocation, LocationService, NoLocation, ResolvedLocation};
use crate::ranking::{SearchRequest, with_distances};
use crate::recommend::{UserPreferences, recommend_scored};
use crate::repository::{
    CafeRepository, FavoritesStore, PreferenceStore, ProfileStore, ReviewStore, SharedStore,
    UserProfile,
};
use crate::review::CategoryRatings;
use crate::storage::{StorageConfig, StorageFactory};

/// Execute a CLI command.
pub fn execute_command(args: CafeScoutArgs) -> Result<()> {
    let session = Session::open(&args)?;

    match &args.command {
        Command::Search(search_args) => search(search_args, &session, &args),
        Command::Recommend(recommend_args) => recommend(recommend_args, &session, &args),
        Command::Distance(distance_args) => distance(distance_args, &args),
        Command::AddCafe(add_args) => add_cafe(add_args, &session, &args),
        Command::Favorite(favorite_command) => favorite(favorite_command, &session, &args),
        Command::Review(review_command) => review(review_command, &session, &args),
        Command::Preferences(preferences_command) => {
            preferences(preferences_command, &session, &args)
        }
        Command::Profile(profile_command) => profile(profile_command, &session, &args),
        Command::ChatContext(chat_args) => chat_context(chat_args, &session, &args),
    }
}

/// Configuration, storage and catalog for one invocation.
struct Session {
    config: CafeScoutConfig,
    store: SharedStore,
    catalog: Catalog,
    /// Saved currency preference, else the configured one.
    currency: Currency,
}

impl Session {
    fn open(args: &CafeScoutArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => CafeScoutConfig::load(path)?,
            None => CafeScoutConfig::default(),
        };

        let storage = match args.data_dir.as_ref().or(config.data_dir.as_ref()) {
            Some(dir) => {
                debug!("using data directory {}", dir.display());
                StorageConfig::File(dir.clone())
            }
            None => {
                debug!("no data directory, changes will not be saved");
                StorageConfig::Memory
            }
        };

        let store = StorageFactory::create(storage)?;
        let currency = ProfileStore::load(store.clone())?.currency(config.currency);

        Ok(Session {
            store,
            catalog: Catalog::builtin()?,
            config,
            currency,
        })
    }

    fn cafes(&self) -> Result<CafeRepository> {
        Ok(CafeRepository::load(self.store.clone(), self.catalog.cafes.clone())?
            .with_default_location(self.config.default_location))
    }

    fn reviews(&self) -> Result<ReviewStore> {
        ReviewStore::load(self.store.clone(), self.catalog.reviews.clone())
    }

    fn locate(&self, location: &LocationArgs) -> Result<Option<ResolvedLocation>> {
        if location.no_location {
            return Ok(None);
        }
        let service = match (location.lat, location.lng) {
            (Some(lat), Some(lng)) => {
                LocationService::new(FixedLocation(GeoPoint::checked(lat, lng)?), &self.config)
            }
            _ => LocationService::new(NoLocation::prompt(), &self.config),
        };
        Ok(Some(service.resolve()))
    }

    fn row(&self, cafe: &Cafe) -> CafeRow {
        CafeRow::new(cafe, self.currency)
    }
}

fn find_cafe(repo: &CafeRepository, id: CafeId) -> Result<Cafe> {
    repo.get(id)
        .cloned()
        .ok_or_else(|| CafeScoutError::not_found(format!("café {id}")))
}

fn search(args: &SearchArgs, session: &Session, cli_args: &CafeScoutArgs) -> Result<()> {
    let cafes = session.cafes()?.all();
    let location = session.locate(&args.location)?;

    let results = SearchRequest::new(args.query.as_str())
        .filters(args.filters.iter().copied().collect::<FilterSet>())
        .sort_mode(args.sort)
        .user_location(location.as_ref().map(|l| l.point))
        .tie_tolerance_km(session.config.distance_tie_tolerance_km)
        .execute(&cafes);

    let limit = args.limit.unwrap_or(results.cafes.len());
    output_result(
        &SearchOutput {
            query: args.query.clone(),
            sort: args.sort.to_string(),
            location: location.as_ref().map(LocationSummary::from),
            total_hits: results.total_hits,
            cafes: results.cafes.iter().take(limit).map(|c| session.row(c)).collect(),
        },
        cli_args,
    )
}

fn recommend(args: &RecommendArgs, session: &Session, cli_args: &CafeScoutArgs) -> Result<()> {
    let mut cafes = session.cafes()?.all();
    let location = session.locate(&args.location)?;
    if let Some(resolved) = &location {
        cafes = with_distances(&cafes, &resolved.point);
    }

    let preferences = PreferenceStore::load(session.store.clone())?;
    let saved = preferences.get();
    let limit = args.limit.unwrap_or(session.config.recommendation_limit);
    let scored = recommend_scored(&cafes, saved, limit);

    output_result(
        &RecommendOutput {
            location: location.as_ref().map(LocationSummary::from),
            personalized: saved.is_some_and(|p| !p.is_empty()),
            recommendations: scored
                .iter()
                .map(|s| RecommendationRow::new(s, session.currency))
                .collect(),
        },
        cli_args,
    )
}

fn distance(args: &DistanceArgs, cli_args: &CafeScoutArgs) -> Result<()> {
    let from = GeoPoint::checked(args.lat1, args.lng1)?;
    let to = GeoPoint::checked(args.lat2, args.lng2)?;

    output_result(
        &DistanceOutput {
            from: [from.lat, from.lng],
            to: [to.lat, to.lng],
            distance_km: from.distance_to(&to),
        },
        cli_args,
    )
}

fn add_cafe(args: &AddCafeArgs, session: &Session, cli_args: &CafeScoutArgs) -> Result<()> {
    let mut repo = session.cafes()?;
    let location = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
        _ => None,
    };

    let cafe = repo.add(NewCafe {
        name: args.name.clone(),
        address: args.address.clone(),
        description: args.description.clone(),
        price_range: args.price,
        phone: args.phone.clone(),
        hours: args.hours.clone(),
        tags: args.tags.clone(),
        location,
    })?;

    output_result(
        &CafeAddedOutput {
            cafe: session.row(&cafe),
            lat: cafe.lat,
            lng: cafe.lng,
        },
        cli_args,
    )
}

fn favorite(command: &FavoriteCommand, session: &Session, cli_args: &CafeScoutArgs) -> Result<()> {
    let repo = session.cafes()?;
    let mut favorites = FavoritesStore::load(session.store.clone())?;

    match command {
        FavoriteCommand::Toggle { id } => {
            let cafe = find_cafe(&repo, *id)?;
            let favorite = favorites.toggle(*id)?;
            output_result(
                &FavoriteToggleOutput {
                    cafe_id: *id,
                    name: cafe.name,
                    favorite,
                },
                cli_args,
            )
        }
        FavoriteCommand::List => {
            let cafes = favorites.favorite_cafes(&repo.all());
            output_result(
                &FavoritesOutput {
                    cafes: cafes.iter().map(|c| session.row(c)).collect(),
                },
                cli_args,
            )
        }
    }
}

fn review(command: &ReviewCommand, session: &Session, cli_args: &CafeScoutArgs) -> Result<()> {
    let mut reviews = session.reviews()?;

    match command {
        ReviewCommand::Add(add) => {
            find_cafe(&session.cafes()?, add.id)?;
            let ratings = CategoryRatings::new(add.drinks, add.food, add.service, add.atmosphere);
            let profiles = ProfileStore::load(session.store.clone())?;
            let profile = profiles.profile();
            let (author, avatar) = match add.user.as_deref() {
                Some(user) => (user, None),
                None => (profile.display_name().unwrap_or(""), profile.avatar()),
            };
            let review = reviews.add(add.id, author, avatar, ratings, &add.text)?;
            output_result(&ReviewAddedOutput { review }, cli_args)
        }
        ReviewCommand::Like { review_id, user } => {
            let liked = reviews.toggle_like(review_id, user)?;
            let likes = reviews.find(review_id).map_or(0, |r| reviews.likes(r));
            output_result(
                &ReviewLikeOutput {
                    review_id: review_id.clone(),
                    liked,
                    likes,
                },
                cli_args,
            )
        }
        ReviewCommand::List { id, sort } => {
            let cafe = find_cafe(&session.cafes()?, *id)?;
            output_result(
                &ReviewListOutput {
                    cafe_id: cafe.id,
                    cafe_name: cafe.name,
                    sort: sort.to_string(),
                    distribution: reviews.rating_distribution(*id),
                    averages: reviews.category_averages(*id),
                    reviews: reviews.for_cafe(*id, *sort),
                },
                cli_args,
            )
        }
    }
}

fn preferences(
    command: &PreferencesCommand,
    session: &Session,
    cli_args: &CafeScoutArgs,
) -> Result<()> {
    let mut store = PreferenceStore::load(session.store.clone())?;

    match command {
        PreferencesCommand::Show => {}
        PreferencesCommand::Set(set) => {
            store.save(UserPreferences {
                cafe_types: set.cafe_types.iter().copied().collect(),
                price_range: set.prices.iter().copied().collect(),
                max_distance: set.max_distance,
                amenities: set.amenities.iter().copied().collect(),
            })?;
        }
        PreferencesCommand::Clear => {
            store.clear()?;
            info!("preferences cleared");
        }
    }

    output_result(
        &PreferencesOutput {
            preferences: store.get().cloned(),
            any_distance_km: session.config.any_distance_km,
        },
        cli_args,
    )
}

fn profile(command: &ProfileCommand, session: &Session, cli_args: &CafeScoutArgs) -> Result<()> {
    let mut store = ProfileStore::load(session.store.clone())?;

    match command {
        ProfileCommand::Show => {}
        ProfileCommand::Set(set) => {
            let current = store.profile().clone();
            store.save_profile(UserProfile {
                name: set.name.clone().unwrap_or(current.name),
                email: set.email.clone().unwrap_or(current.email),
                phone: set.phone.clone().unwrap_or(current.phone),
                avatar: set.avatar.clone().or(current.avatar),
            })?;
        }
        ProfileCommand::Currency { currency } => {
            let currency = match currency {
                Some(currency) => {
                    store.set_currency(*currency)?;
                    *currency
                }
                None => store.toggle_currency(session.currency)?,
            };
            info!("prices shown in {currency}");
        }
    }

    output_result(
        &ProfileOutput {
            profile: store.profile().clone(),
            currency: store.currency(session.config.currency),
        },
        cli_args,
    )
}

fn chat_context(args: &ChatContextArgs, session: &Session, cli_args: &CafeScoutArgs) -> Result<()> {
    let cafes = session.cafes()?.all();
    let reviews = session.reviews()?;
    let point = session.locate(&args.location)?.map(|l| l.point);

    let cafes = ChatContextBuilder::from_config(&session.config).build(&cafes, &reviews, point);
    output_result(
        &ChatContextOutput {
            user_location: user_location_line(point),
            cafes,
        },
        cli_args,
    )
}
