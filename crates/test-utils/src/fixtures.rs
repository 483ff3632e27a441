//! Common test fixtures: reference places and canned provider answers.

/// Reference places with their expected KMA grid cells.
pub mod places {
    /// (name, latitude, longitude, grid x, grid y)
    pub type Place = (&'static str, f64, f64, i32, i32);

    pub const SEOUL_CITY_HALL: Place = ("Seoul City Hall", 37.5665, 126.9780, 60, 127);
    pub const BUSAN_CITY_HALL: Place = ("Busan City Hall", 35.1796, 129.0756, 98, 76);
    pub const JEJU_CITY: Place = ("Jeju City", 33.4996, 126.5312, 53, 38);
    pub const DAEJEON: Place = ("Daejeon", 36.3504, 127.3845, 67, 100);

    /// Inside the service area.
    pub const INSIDE: [Place; 4] = [SEOUL_CITY_HALL, BUSAN_CITY_HALL, JEJU_CITY, DAEJEON];

    /// Outside the service area: (name, latitude, longitude).
    pub const OUTSIDE: [(&str, f64, f64); 4] = [
        ("Tokyo", 35.6762, 139.6503),
        ("Beijing", 39.9042, 116.4074),
        ("Pyongyang", 39.0392, 125.7625),
        ("Null Island", 0.0, 0.0),
    ];
}

/// Canned upstream response bodies, shaped like the real services.
pub mod bodies {
    /// `getUltraSrtNcst` for Seoul at 2024-01-15 14:00.
    pub const KMA_NOWCAST: &str = r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL_SERVICE"},"body":{"dataType":"JSON","items":{"item":[
        {"baseDate":"20240115","baseTime":"1400","category":"PTY","nx":60,"ny":127,"obsrValue":"0"},
        {"baseDate":"20240115","baseTime":"1400","category":"REH","nx":60,"ny":127,"obsrValue":"45"},
        {"baseDate":"20240115","baseTime":"1400","category":"RN1","nx":60,"ny":127,"obsrValue":"0"},
        {"baseDate":"20240115","baseTime":"1400","category":"T1H","nx":60,"ny":127,"obsrValue":"-3.2"},
        {"baseDate":"20240115","baseTime":"1400","category":"UUU","nx":60,"ny":127,"obsrValue":"1.5"},
        {"baseDate":"20240115","baseTime":"1400","category":"VEC","nx":60,"ny":127,"obsrValue":"299"},
        {"baseDate":"20240115","baseTime":"1400","category":"VVV","nx":60,"ny":127,"obsrValue":"-0.8"},
        {"baseDate":"20240115","baseTime":"1400","category":"WSD","nx":60,"ny":127,"obsrValue":"1.7"}
    ]},"pageNo":1,"numOfRows":30,"totalCount":8}}}"#;

    /// `getUltraSrtFcst` for Seoul at base 2024-01-15 13:30, two instants.
    pub const KMA_FORECAST: &str = r#"{"response":{"header":{"resultCode":"00","resultMsg":"NORMAL_SERVICE"},"body":{"dataType":"JSON","items":{"item":[
        {"baseDate":"20240115","baseTime":"1330","category":"LGT","fcstDate":"20240115","fcstTime":"1400","fcstValue":"0","nx":60,"ny":127},
        {"baseDate":"20240115","baseTime":"1330","category":"LGT","fcstDate":"20240115","fcstTime":"1500","fcstValue":"0","nx":60,"ny":127},
        {"baseDate":"20240115","baseTime":"1330","category":"PTY","fcstDate":"20240115","fcstTime":"1400","fcstValue":"0","nx":60,"ny":127},
        {"baseDate":"20240115","baseTime":"1330","category":"PTY","fcstDate":"20240115","fcstTime":"1500","fcstValue":"1","nx":60,"ny":127},
        {"baseDate":"20240115","baseTime":"1330","category":"RN1","fcstDate":"20240115","fcstTime":"1400","fcstValue":"강수없음","nx":60,"ny":127},
        {"baseDate":"20240115","baseTime":"1330","category":"RN1","fcstDate":"20240115","fcstTime":"1500","fcstValue":"1.0mm","nx":60,"ny":127},
        {"baseDate":"20240115","baseTime":"1330","category":"SKY","fcstDate":"20240115","fcstTime":"1400","fcstValue":"3","nx":60,"ny":127},
        {"baseDate":"20240115","baseTime":"1330","category":"SKY","fcstDate":"20240115","fcstTime":"1500","fcstValue":"4","nx":60,"ny":127},
        {"baseDate":"20240115","baseTime":"1330","category":"T1H","fcstDate":"20240115","fcstTime":"1400","fcstValue":"-3","nx":60,"ny":127},
        {"baseDate":"20240115","baseTime":"1330","category":"T1H","fcstDate":"20240115","fcstTime":"1500","fcstValue":"-2","nx":60,"ny":127}
    ]},"pageNo":1,"numOfRows":60,"totalCount":10}}}"#;

    /// KMA answer when the requested base time is not published yet.
    pub const KMA_NO_DATA: &str =
        r#"{"response":{"header":{"resultCode":"03","resultMsg":"NO_DATA"}}}"#;

    /// `getNearbyMsrstnList` answer with four stations.
    pub const AIRKOREA_STATIONS: &str = r#"{"response":{"body":{"totalCount":4,"items":[
        {"tm":0.9,"addr":"서울 중구 덕수궁길 15","stationName":"중구"},
        {"tm":2.1,"addr":"서울 종로구 종로35가길 19","stationName":"종로구"},
        {"tm":2.9,"addr":"서울 용산구 한남대로 136","stationName":"용산구"},
        {"tm":3.5,"addr":"서울 서대문구 세검정로4길 32","stationName":"서대문구"}
    ],"pageNo":1,"numOfRows":10},"header":{"resultMsg":"NORMAL_CODE","resultCode":"00"}}}"#;

    /// `getMsrstnAcctoRltmMesureDnsty` answer with readings.
    pub const AIRKOREA_MEASUREMENT: &str = r#"{"response":{"body":{"totalCount":24,"items":[
        {"so2Grade":"1","coFlag":null,"khaiValue":"61","so2Value":"0.003","coValue":"0.4","pm10Flag":null,"pm10Value":"31","o3Grade":"1","khaiGrade":"2","pm25Value":"12","no2Flag":null,"no2Grade":"2","o3Flag":null,"pm25Grade":"1","so2Flag":null,"dataTime":"2024-01-15 14:00","coGrade":"1","no2Value":"0.031","pm10Grade":"1","o3Value":"0.020","pm10Grade1h":"2","pm25Grade1h":"1"}
    ],"pageNo":1,"numOfRows":1},"header":{"resultMsg":"NORMAL_CODE","resultCode":"00"}}}"#;

    /// Measurement answer from a station whose analysers are down.
    pub const AIRKOREA_MEASUREMENT_DASHES: &str = r#"{"response":{"body":{"totalCount":24,"items":[
        {"dataTime":"2024-01-15 14:00","pm10Value":"-","pm25Value":"-","pm10Grade1h":null,"pm25Grade1h":null,"pm10Flag":"통신장애","pm25Flag":"통신장애"}
    ],"pageNo":1,"numOfRows":1},"header":{"resultMsg":"NORMAL_CODE","resultCode":"00"}}}"#;

    /// Gateway answer for an unregistered service key.
    pub const GATEWAY_KEY_ERROR: &str = "<OpenAPI_ServiceResponse>\n\t<cmmMsgHeader>\n\t\t<errMsg>SERVICE ERROR</errMsg>\n\t\t<returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\n\t\t<returnReasonCode>30</returnReasonCode>\n\t</cmmMsgHeader>\n</OpenAPI_ServiceResponse>";

    /// Nominatim reverse answer for Seoul City Hall.
    pub const NOMINATIM_SEOUL: &str = r#"{"place_id":123,"licence":"Data © OpenStreetMap contributors, ODbL 1.0.","osm_type":"way","lat":"37.5665","lon":"126.978","display_name":"서울특별시청, 110, 세종대로, 명동, 중구, 서울특별시, 04524, 대한민국","address":{"amenity":"서울특별시청","house_number":"110","road":"세종대로","quarter":"명동","borough":"중구","city":"서울특별시","ISO3166-2-lvl4":"KR-11","postcode":"04524","country":"대한민국","country_code":"kr"}}"#;

    pub const NOMINATIM_ERROR: &str = r#"{"error":"Unable to geocode"}"#;

    /// KASI `getLCRiseSetInfo` answer for Seoul on 2024-01-15.
    pub const KASI_RISE_SET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><response><header><resultCode>00</resultCode><resultMsg>NORMAL SERVICE.</resultMsg></header><body><items><item><aste>1917      </aste><astm>0600      </astm><civile>1802      </civile><civilm>0718      </civilm><latitude>3734</latitude><latitudeNum>37.5665000000</latitudeNum><locdate>20240115</locdate><location>126.9780000000</location><longitude>12658</longitude><longitudeNum>126.9780000000</longitudeNum><moonrise>1041      </moonrise><moonset>2320      </moonset><moontransit>1656      </moontransit><naute>1833      </naute><nautm>0647      </nautm><sunrise>0746      </sunrise><sunset>1734      </sunset><suntransit>1240      </suntransit></item></items><numOfRows>10</numOfRows><pageNo>1</pageNo><totalCount>1</totalCount></body></response>"#;
}
