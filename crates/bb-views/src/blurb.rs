//! Explanatory text shown under each chart

use bb_core::VisualizationKind;

/// The fixed explanation for a visualization kind
pub fn explanation(kind: VisualizationKind) -> &'static str {
    match kind {
        VisualizationKind::MonthlyTrend => {
            "The Monthly Trend Analysis visualization shows the number of trips per month in 2020. \
             The monthly trend data reveals a seasonal pattern in bike-sharing usage, with higher numbers of \
             trips occurring during the warmer months and lower numbers during the colder months. A \
             significant dip in April 2020 is likely due to the impact of COVID-19 lockdowns. The peak usage \
             occurs in August and September 2020, which can be attributed to favorable weather conditions. \
             Overall, bike-sharing usage is heavily influenced by seasonal weather patterns."
        }
        VisualizationKind::TripDuration => {
            "The Trip Duration Analysis visualization shows the distribution of trip durations in seconds \
             (0-2000). The trip duration data shows that the distribution of bike trips is right skewed, with \
             most trips being of shorter durations. The highest number of trips fall within the 300-349 \
             seconds range, followed by a gradual decline in frequency. The majority of users seem to prefer \
             shorter trips, possibly for commuting or leisure purposes, indicating that bike-sharing is \
             primarily utilized for shorter, more convenient journeys."
        }
        VisualizationKind::CustomerSubscriber => {
            "The Customer vs Subscriber Analysis visualization shows the proportion of trips made by customers \
             and subscribers. The data from the customer vs. subscriber analysis indicates that a significant \
             majority (72%) of bike-sharing users are subscribers, while the remaining 28% are customers. \
             This suggests that bike-sharing services are popular among regular users who find value in \
             subscribing to the service, possibly for daily commutes or frequent short trips."
        }
        VisualizationKind::HourlyWeeklyHeatmap => {
            "The Heatmap of Trips per Hour and Day of the Week shows the number of trips per hour and day of \
             the week. Weekdays experience the highest number of trips during morning (7-9 AM) and evening \
             (5-7 PM) commute hours, suggesting that the service is primarily used for work commutes. On \
             weekends, there is slightly higher usage during the daytime and evenings, likely due to \
             recreational and social activities. Early mornings (0-4) across all days witness the lowest \
             number of trips, with a sharp decline in trips after 10 PM."
        }
        VisualizationKind::TopStations => {
            "The Top Start and End Stations visualization shows the top 10 start and end stations by number of \
             trips. The data highlights the top 10 start and end stations, with Central Square at \
             Mass Ave / Essex St and Charles Circle - Charles St at Cambridge St being the most popular. Other \
             significant stations, such as MIT at Mass Ave/Amherst St and Christian Science Plaza, are \
             also popular. Some stations, like Cross St at Hanover St, are more popular start stations, and \
             others, like Nashua Street at Red Auerbach Way, are popular end stations."
        }
        VisualizationKind::PostalCode => {
            "The Postal Code Analysis visualization shows the top 10 postal codes by the number of trips. \
             The postal code analysis shows that the highest number of trips are concentrated in the 02139 \
             postal code (Cambridge, MA), with more than double the trips compared to the second highest, \
             02215. Given that the highest concentration is in 02139, it suggests that the Cambridge area is \
             a crucial region for the service. This could be due to the presence of key locations, such as \
             educational institutions, businesses, or popular destinations."
        }
    }
}

/// Explanation for a kind given by its id; unknown ids get an empty string
pub fn explanation_for_id(id: &str) -> &'static str {
    id.parse::<VisualizationKind>().map(explanation).unwrap_or("")
}
